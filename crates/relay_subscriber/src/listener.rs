use std::io::Write;

use relay_channel::{ChannelError, InputChannel};
use tracing::{info, warn};

use crate::handler::MessageHandler;

/// Feed every message from `input` to `handler` until the binding ends.
///
/// Returns how many messages were handled. A frame that cannot be decoded
/// is logged and skipped; any other channel error stops the loop.
pub async fn run<I, W>(input: &mut I, handler: &mut MessageHandler<W>) -> Result<usize, ChannelError>
where
    I: InputChannel + ?Sized,
    W: Write,
{
    let mut handled = 0;

    loop {
        match input.recv().await {
            Ok(Some(message)) => {
                handler.handle(&message);
                handled += 1;
            }
            Ok(None) => {
                info!(handled, "input channel closed");
                return Ok(handled);
            }
            Err(e) if !e.is_fatal() => {
                warn!(error = %e, "skipping undecodable message");
            }
            Err(e) => return Err(e),
        }
    }
}
