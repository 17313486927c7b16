use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;

/// Map a level name from configuration or the command line to a tracing level.
///
/// Unknown names fall back to `INFO`.
pub fn parse_level(name: &str) -> tracing::Level {
    match name.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" | "warning" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    }
}

/// A plain-text fmt dispatcher at `level` writing to `writer`.
pub fn dispatch_to<W>(level: &str, writer: W) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .finish();
    Dispatch::new(subscriber)
}

/// Build the stdout dispatcher at `level`, install it as the process-wide
/// default and hand it back so it can be passed to the handlers.
pub fn init(level: &str) -> Dispatch {
    let dispatch = Dispatch::new(
        tracing_subscriber::fmt()
            .with_max_level(parse_level(level))
            .with_target(false)
            .finish(),
    );
    // both services and the tests may race to install it; first one wins
    let _ = tracing::dispatcher::set_global_default(dispatch.clone());
    dispatch
}
