//! In-process binder.
//!
//! A `MemoryBinder` plays the broker for a single topic inside one process:
//! every input created from it sees every message sent through any of its
//! outputs after the input was created.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::channel::{InputChannel, OutputChannel};
use crate::error::ChannelError;
use crate::message::Message;

#[derive(Debug, Clone)]
pub struct MemoryBinder {
    sender: broadcast::Sender<Message>,
}

impl MemoryBinder {
    /// `capacity` bounds how far an input may fall behind before it starts
    /// losing messages.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn output(&self) -> MemoryOutputChannel {
        MemoryOutputChannel {
            sender: self.sender.clone(),
        }
    }

    pub fn input(&self) -> MemoryInputChannel {
        MemoryInputChannel {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for MemoryBinder {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[derive(Debug, Clone)]
pub struct MemoryOutputChannel {
    sender: broadcast::Sender<Message>,
}

#[async_trait]
impl OutputChannel for MemoryOutputChannel {
    async fn send(&self, message: Message) -> Result<(), ChannelError> {
        // No live input: the message is dropped, as a broker would.
        if self.sender.send(message).is_err() {
            debug!("no inputs bound, message dropped");
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct MemoryInputChannel {
    receiver: broadcast::Receiver<Message>,
}

#[async_trait]
impl InputChannel for MemoryInputChannel {
    async fn recv(&mut self) -> Result<Option<Message>, ChannelError> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Ok(Some(message)),
                Err(broadcast::error::RecvError::Closed) => return Ok(None),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "input fell behind, messages lost");
                }
            }
        }
    }
}
