//! relay_publisher
//!
//! HTTP front of the relay. `GET /sendMessage/{message}` turns the path
//! parameter into a `Message` and hands it to the output channel:
//!
//! - `200` with `Message {message} sent to the publishers` once the message
//!   is on its way to the broker
//! - `400` for an empty message
//! - `503` when the broker cannot be reached
//! - `500` for any other channel failure

pub mod handler;

pub use handler::{PublishError, confirmation, publish, router, serve};
