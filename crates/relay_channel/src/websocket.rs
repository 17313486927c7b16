//! WebSocket binder
//!
//! Binds channels to a topic on a popsub broker:
//! - every connection starts with the broker's `login` -> `auth` handshake;
//!   an `error` frame during the handshake is `ChannelError::Unavailable`
//! - `WsOutputChannel` connects on first use, publishes one JSON `publish`
//!   frame per message and reconnects after the connection is lost
//! - `WsInputChannel` connects at bind time, subscribes to its destination
//!   and yields the payload of every `message` frame for that destination;
//!   if the broker hangs up after an `error` frame the subscription ends
//!   with `ChannelError::Rejected`
//!
//! Connecting, including the handshake, is bounded by the configured
//! timeout. Only one reconnect runs at a time; sends arriving meanwhile
//! fail straight away instead of queueing behind it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::channel::{InputChannel, OutputChannel};
use crate::error::ChannelError;
use crate::frame::{ClientFrame, ServerFrame};
use crate::message::Message;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Where the broker lives and how to log in to it.
#[derive(Debug, Clone)]
pub struct BrokerOptions {
    pub url: String,
    pub username: String,
    pub password: String,
    pub connect_timeout: Duration,
}

async fn send_frame(stream: &mut WsStream, frame: ClientFrame) -> Result<(), ChannelError> {
    stream.send(WsMessage::text(frame.encode()?)).await?;
    Ok(())
}

/// Next frame the broker sends during the handshake. An `error` frame or a
/// hang-up means the broker will not serve this connection.
async fn handshake_reply(stream: &mut WsStream, url: &str) -> Result<ServerFrame, ChannelError> {
    while let Some(next) = stream.next().await {
        if let WsMessage::Text(text) = next? {
            return match ServerFrame::decode(&text)? {
                ServerFrame::Error { message } => Err(ChannelError::Unavailable(format!(
                    "{url} rejected login: {message}"
                ))),
                frame => Ok(frame),
            };
        }
    }

    Err(ChannelError::Unavailable(format!(
        "{url} closed the connection during login"
    )))
}

async fn login(stream: &mut WsStream, options: &BrokerOptions) -> Result<(), ChannelError> {
    let url = options.url.as_str();
    send_frame(
        stream,
        ClientFrame::Login {
            username: options.username.clone(),
            password: options.password.clone(),
        },
    )
    .await?;

    let token = match handshake_reply(stream, url).await? {
        ServerFrame::LoginResponse { token } => token,
        other => {
            return Err(ChannelError::Unavailable(format!(
                "{url} answered login with {other:?}"
            )));
        }
    };

    send_frame(stream, ClientFrame::Auth { token }).await?;
    match handshake_reply(stream, url).await? {
        ServerFrame::Authenticated {} => Ok(()),
        other => Err(ChannelError::Unavailable(format!(
            "{url} answered auth with {other:?}"
        ))),
    }
}

async fn connect(options: &BrokerOptions) -> Result<WsStream, ChannelError> {
    let url = options.url.as_str();
    let attempt = async {
        let (mut stream, _response) = connect_async(url)
            .await
            .map_err(|e| ChannelError::Unavailable(format!("{url}: {e}")))?;
        login(&mut stream, options).await?;
        Ok::<_, ChannelError>(stream)
    };

    let stream = tokio::time::timeout(options.connect_timeout, attempt)
        .await
        .map_err(|_| {
            ChannelError::Unavailable(format!(
                "timed out after {}ms connecting to {url}",
                options.connect_timeout.as_millis()
            ))
        })??;

    info!(url = %url, "connected to broker");
    Ok(stream)
}

struct Connection {
    sink: SplitSink<WsStream, WsMessage>,
    alive: Arc<AtomicBool>,
}

impl Connection {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

pub struct WsOutputChannel {
    options: BrokerOptions,
    destination: String,
    connection: Mutex<Option<Connection>>,
    connecting: AtomicBool,
}

impl WsOutputChannel {
    /// Create an output bound to `destination`. No connection is made until
    /// the first `send`.
    pub fn new(options: BrokerOptions, destination: &str) -> Self {
        Self {
            options,
            destination: destination.to_string(),
            connection: Mutex::new(None),
            connecting: AtomicBool::new(false),
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    async fn open(&self) -> Result<Connection, ChannelError> {
        let stream = connect(&self.options).await?;
        let (sink, mut source) = stream.split();
        let alive = Arc::new(AtomicBool::new(true));

        // Drain the read half so control frames are processed and broker
        // errors show up in the log; flag the connection dead when it ends.
        {
            let alive = alive.clone();
            let url = self.options.url.clone();
            tokio::spawn(async move {
                while let Some(Ok(msg)) = source.next().await {
                    if let WsMessage::Text(text) = msg {
                        if let Ok(ServerFrame::Error { message }) = ServerFrame::decode(&text) {
                            warn!(url = %url, error = %message, "broker rejected frame");
                        }
                    }
                }
                alive.store(false, Ordering::SeqCst);
                debug!(url = %url, "broker connection closed");
            });
        }

        Ok(Connection { sink, alive })
    }

    /// Replace the connection. Runs without holding the connection lock.
    async fn reconnect(&self) -> Result<(), ChannelError> {
        if self.connecting.swap(true, Ordering::SeqCst) {
            return Err(ChannelError::Unavailable(format!(
                "reconnect to {} already in progress",
                self.options.url
            )));
        }

        let result = self.open().await;
        self.connecting.store(false, Ordering::SeqCst);

        *self.connection.lock().await = Some(result?);
        Ok(())
    }
}

#[async_trait]
impl OutputChannel for WsOutputChannel {
    async fn send(&self, message: Message) -> Result<(), ChannelError> {
        let text = ClientFrame::publish(&self.destination, &message).encode()?;

        let mut slot = self.connection.lock().await;
        if !slot.as_ref().is_some_and(Connection::is_alive) {
            drop(slot);
            self.reconnect().await?;
            slot = self.connection.lock().await;
        }

        let Some(connection) = slot.as_mut() else {
            return Err(ChannelError::Closed);
        };

        match connection.sink.send(WsMessage::text(text)).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(url = %self.options.url, error = %e, "publish failed, dropping connection");
                *slot = None;
                Err(e.into())
            }
        }
    }
}

pub struct WsInputChannel {
    destination: String,
    stream: WsStream,
    rejection: Option<String>,
}

impl WsInputChannel {
    /// Connect to the broker, log in and subscribe to `destination`.
    pub async fn bind(options: &BrokerOptions, destination: &str) -> Result<Self, ChannelError> {
        let mut stream = connect(options).await?;
        send_frame(&mut stream, ClientFrame::subscribe(destination)).await?;
        info!(destination = %destination, "subscribed");

        Ok(Self {
            destination: destination.to_string(),
            stream,
            rejection: None,
        })
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// End of the subscription: clean unless the broker's last word was an
    /// error.
    fn finish(&mut self) -> Result<Option<Message>, ChannelError> {
        match self.rejection.take() {
            Some(reason) => Err(ChannelError::Rejected(reason)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl InputChannel for WsInputChannel {
    async fn recv(&mut self) -> Result<Option<Message>, ChannelError> {
        while let Some(next) = self.stream.next().await {
            match next? {
                WsMessage::Text(text) => match ServerFrame::decode(&text)? {
                    ServerFrame::Message { topic, payload } if topic == self.destination => {
                        self.rejection = None;
                        return Ok(Some(Message::new(payload)));
                    }
                    ServerFrame::Message { topic, .. } => {
                        debug!(topic = %topic, "skipping message for another destination");
                    }
                    ServerFrame::Error { message } => {
                        warn!(error = %message, "broker reported an error");
                        self.rejection = Some(message);
                    }
                    other => {
                        debug!(frame = ?other, "ignoring unexpected frame");
                    }
                },
                WsMessage::Binary(_) => {
                    return Err(ChannelError::Decode("unexpected binary frame".to_string()));
                }
                WsMessage::Close(_) => return self.finish(),
                _ => {}
            }
        }

        self.finish()
    }
}
