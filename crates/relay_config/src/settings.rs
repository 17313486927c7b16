use serde::Deserialize;

/// Top-level configuration for both relay services.
///
/// The publisher reads `server`, `broker` and `bindings.output`; the
/// subscriber reads `broker` and `bindings.input`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub broker: BrokerSettings,
    pub bindings: BindingSettings,
    pub logging: LoggingSettings,
}

/// Address the publisher's HTTP listener binds to.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Broker connection details.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BrokerSettings {
    /// WebSocket URL of the broker, e.g. `ws://127.0.0.1:9000`.
    pub url: String,
    /// Credentials for the broker's `login` frame.
    pub username: String,
    pub password: String,
    pub connect_timeout_ms: u64,
}

/// Broker destinations the output and input channels are bound to.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BindingSettings {
    pub output: String,
    pub input: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Settings as read from files or the environment; every value is optional
/// and missing ones are filled from `Settings::default()`.
#[derive(Debug, Deserialize, Default)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub broker: Option<PartialBrokerSettings>,
    pub bindings: Option<PartialBindingSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialBrokerSettings {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialBindingSettings {
    pub output: Option<String>,
    pub input: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            broker: BrokerSettings {
                url: "ws://127.0.0.1:9000".to_string(),
                username: String::new(),
                password: String::new(),
                connect_timeout_ms: 3000,
            },
            bindings: BindingSettings {
                output: "messages".to_string(),
                input: "messages".to_string(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Overlay the values present in `partial` on top of `self`.
    pub fn merge(self, partial: PartialSettings) -> Settings {
        let server = partial.server.unwrap_or_default();
        let broker = partial.broker.unwrap_or_default();
        let bindings = partial.bindings.unwrap_or_default();
        let logging = partial.logging.unwrap_or_default();

        Settings {
            server: ServerSettings {
                host: server.host.unwrap_or(self.server.host),
                port: server.port.unwrap_or(self.server.port),
            },
            broker: BrokerSettings {
                url: broker.url.unwrap_or(self.broker.url),
                username: broker.username.unwrap_or(self.broker.username),
                password: broker.password.unwrap_or(self.broker.password),
                connect_timeout_ms: broker
                    .connect_timeout_ms
                    .unwrap_or(self.broker.connect_timeout_ms),
            },
            bindings: BindingSettings {
                output: bindings.output.unwrap_or(self.bindings.output),
                input: bindings.input.unwrap_or(self.bindings.input),
            },
            logging: LoggingSettings {
                level: logging.level.unwrap_or(self.logging.level),
            },
        }
    }
}
