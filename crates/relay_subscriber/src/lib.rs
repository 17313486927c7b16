//! relay_subscriber
//!
//! Consumer side of the relay: `listener::run` pulls messages off an input
//! channel and hands each one to a `MessageHandler`, which logs the payload
//! and writes it to its output sink.

pub mod handler;
pub mod listener;

pub use handler::MessageHandler;
pub use listener::run;
