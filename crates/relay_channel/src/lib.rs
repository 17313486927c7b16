//! relay_channel
//!
//! The messaging boundary shared by the publisher and the subscriber:
//!
//! - `Message`: the `{ payload }` envelope and its UTF-8 byte encoding
//! - `OutputChannel` / `InputChannel`: what a service sees of the broker
//! - `websocket`: binder that logs in to a popsub broker over WebSocket
//! - `memory`: in-process binder backed by a broadcast channel
//!
//! Broker connection details and destination names are passed in
//! explicitly; nothing is looked up globally.

pub mod channel;
pub mod error;
pub mod frame;
pub mod memory;
pub mod message;
pub mod websocket;

pub use channel::{InputChannel, OutputChannel};
pub use error::ChannelError;
pub use memory::MemoryBinder;
pub use message::Message;
pub use websocket::{BrokerOptions, WsInputChannel, WsOutputChannel};

#[cfg(test)]
mod tests;
