use std::io::{self, Stdout, Write};

use relay_channel::Message;
use tracing::dispatcher::{self, Dispatch};
use tracing::{error, info};

/// Logs and prints every received payload on its own line.
///
/// Both the output sink and the log dispatcher are handed in by the caller;
/// the service uses stdout and its process-wide dispatcher.
#[derive(Debug)]
pub struct MessageHandler<W> {
    out: W,
    log: Dispatch,
}

impl MessageHandler<Stdout> {
    pub fn stdout(log: Dispatch) -> Self {
        Self::new(io::stdout(), log)
    }
}

impl<W: Write> MessageHandler<W> {
    pub fn new(out: W, log: Dispatch) -> Self {
        Self { out, log }
    }

    /// Handle one message. Write failures are logged and swallowed so a bad
    /// sink never takes the subscriber down.
    pub fn handle(&mut self, message: &Message) {
        let written = self.write(message);

        dispatcher::with_default(&self.log, || {
            info!(payload = %message.payload(), "message received");
            if let Err(e) = written {
                error!(error = %e, "failed to write message");
            }
        });
    }

    fn write(&mut self, message: &Message) -> io::Result<()> {
        writeln!(self.out, "{}", message.payload())?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
