use async_trait::async_trait;

use crate::error::ChannelError;
use crate::message::Message;

/// Producer side of a binding.
///
/// `send` returns once the message has been handed to the broker
/// connection; it does not wait for the broker to acknowledge it.
#[async_trait]
pub trait OutputChannel: Send + Sync {
    async fn send(&self, message: Message) -> Result<(), ChannelError>;
}

/// Consumer side of a binding.
#[async_trait]
pub trait InputChannel: Send {
    /// Next message from the broker, or `None` once the binding has ended.
    async fn recv(&mut self) -> Result<Option<Message>, ChannelError>;
}
