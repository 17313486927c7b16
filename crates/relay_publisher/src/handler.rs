use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use relay_channel::{ChannelError, Message, OutputChannel};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::dispatcher::{self, Dispatch};
use tracing::{error, info, warn};

/// Shared state for axum handlers: where messages go and where log lines go.
#[derive(Clone)]
struct AppState {
    output: Arc<dyn OutputChannel>,
    log: Dispatch,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("message must not be empty")]
    EmptyPayload,
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl IntoResponse for PublishError {
    fn into_response(self) -> Response {
        let status = match &self {
            PublishError::EmptyPayload => StatusCode::BAD_REQUEST,
            PublishError::Channel(e) if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            PublishError::Channel(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

pub fn confirmation(message: &str) -> String {
    format!("Message {message} sent to the publishers")
}

/// Send `message` on `output` and return the confirmation text. Log lines
/// go to `log`.
pub async fn publish(
    output: &dyn OutputChannel,
    log: &Dispatch,
    message: String,
) -> Result<String, PublishError> {
    dispatcher::with_default(log, || info!(payload = %message, "Receive message"));

    let message = Message::new(message);
    let result = if message.is_empty() {
        Err(PublishError::EmptyPayload)
    } else {
        let reply = confirmation(message.payload());
        output.send(message).await.map(|()| reply).map_err(PublishError::from)
    };

    if let Err(e) = &result {
        dispatcher::with_default(log, || match e {
            PublishError::EmptyPayload => warn!(error = %e, "rejected message"),
            PublishError::Channel(_) => error!(error = %e, "failed to publish message"),
        });
    }
    result
}

async fn send_message(
    State(state): State<AppState>,
    Path(message): Path<String>,
) -> Result<String, PublishError> {
    publish(state.output.as_ref(), &state.log, message).await
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Build the axum router (separated for testing).
pub fn router(output: Arc<dyn OutputChannel>, log: Dispatch) -> Router {
    Router::new()
        .route("/sendMessage/:message", get(send_message))
        .route("/health", get(health))
        .with_state(AppState { output, log })
}

/// Serve the publisher on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    output: Arc<dyn OutputChannel>,
    log: Dispatch,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    dispatcher::with_default(&log, || info!(addr = %addr, "publisher listening"));
    axum::serve(listener, router(output, log))
        .with_graceful_shutdown(shutdown)
        .await
}
