//! CLI for the relay
//!
//! Subcommands:
//! - `publisher`: serve `GET /sendMessage/{message}` and publish to the output binding
//! - `subscriber`: print every message arriving on the input binding

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use relay_channel::{BrokerOptions, WsInputChannel, WsOutputChannel};
use relay_config::{DEFAULT_CONFIG_PATH, Settings, load_config_from};
use relay_subscriber::MessageHandler;
use relay_utils::error::BoxError;
use tokio::net::TcpListener;
use tracing::{Dispatch, Instrument, error, info, info_span};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "relay")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file, extension optional
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Overrides `logging.level` from the configuration
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand, PartialEq)]
enum Command {
    /// Run the HTTP publisher
    Publisher,
    /// Run the subscriber
    Subscriber,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = match load_config_from(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            relay_utils::logging::init("info");
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let log =
        relay_utils::logging::init(cli.log_level.as_deref().unwrap_or(&settings.logging.level));

    let instance = Uuid::new_v4();
    let result = match cli.command {
        Command::Publisher => {
            run_publisher(settings, log)
                .instrument(info_span!("publisher", %instance))
                .await
        }
        Command::Subscriber => {
            run_subscriber(settings, log)
                .instrument(info_span!("subscriber", %instance))
                .await
        }
    };

    if let Err(e) = result {
        error!("{:?} failed: {}", cli.command, e);
        std::process::exit(1);
    }
}

fn broker_options(settings: &Settings) -> BrokerOptions {
    BrokerOptions {
        url: settings.broker.url.clone(),
        username: settings.broker.username.clone(),
        password: settings.broker.password.clone(),
        connect_timeout: Duration::from_millis(settings.broker.connect_timeout_ms),
    }
}

async fn run_publisher(settings: Settings, log: Dispatch) -> Result<(), BoxError> {
    let output = Arc::new(WsOutputChannel::new(
        broker_options(&settings),
        &settings.bindings.output,
    ));
    info!(
        broker = %settings.broker.url,
        destination = %output.destination(),
        "output channel bound"
    );

    let listener = TcpListener::bind(settings.server.addr()).await?;
    relay_publisher::serve(listener, output, log, shutdown_signal()).await?;
    Ok(())
}

async fn run_subscriber(settings: Settings, log: Dispatch) -> Result<(), BoxError> {
    let mut input =
        WsInputChannel::bind(&broker_options(&settings), &settings.bindings.input).await?;
    info!(
        broker = %settings.broker.url,
        destination = %input.destination(),
        "input channel bound"
    );

    let mut handler = MessageHandler::stdout(log);

    tokio::select! {
        result = relay_subscriber::run(&mut input, &mut handler) => {
            let handled = result?;
            info!(handled, "Broker closed the subscription.");
        }
        _ = shutdown_signal() => {}
    }

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received. Exiting gracefully."),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands_with_defaults() {
        let cli = Cli::try_parse_from(["relay", "publisher"]).unwrap();
        assert_eq!(cli.command, Command::Publisher);
        assert_eq!(cli.config, DEFAULT_CONFIG_PATH);
        assert_eq!(cli.log_level, None);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "relay",
            "subscriber",
            "--config",
            "/etc/relay/prod",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.command, Command::Subscriber);
        assert_eq!(cli.config, "/etc/relay/prod");
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["relay"]).is_err());
    }

    #[test]
    fn broker_options_come_from_settings() {
        let mut settings = Settings::default();
        settings.broker.username = "admin".to_string();
        settings.broker.password = "password".to_string();

        let options = broker_options(&settings);
        assert_eq!(options.url, "ws://127.0.0.1:9000");
        assert_eq!(options.username, "admin");
        assert_eq!(options.password, "password");
        assert_eq!(options.connect_timeout, Duration::from_millis(3000));
    }
}
