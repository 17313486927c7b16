//! JSON frames exchanged with the broker.
//!
//! This is the wire contract: one text WebSocket frame per JSON object,
//! and a message payload travels as the JSON `payload` string, unchanged.
//! Outbound frames are what a client sends (`login`, `auth`, `subscribe`,
//! `publish`); inbound frames are what the broker pushes back. Only the
//! fields the relay needs are modelled; anything else is ignored.

use serde::{Deserialize, Serialize};

use crate::error::ChannelError;
use crate::message::Message;

#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum ClientFrame {
    #[serde(rename = "login")]
    Login { username: String, password: String },
    #[serde(rename = "auth")]
    Auth { token: String },
    #[serde(rename = "subscribe")]
    Subscribe { topic: String },
    #[serde(rename = "publish")]
    Publish {
        topic: String,
        payload: String,
        qos: u8,
    },
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum ServerFrame {
    #[serde(rename = "login_response")]
    LoginResponse { token: String },
    #[serde(rename = "authenticated")]
    Authenticated {},
    #[serde(rename = "message")]
    Message { topic: String, payload: String },
    #[serde(rename = "error")]
    Error { message: String },
}

impl ClientFrame {
    /// Fire-and-forget publish; the broker is not asked for an ack.
    pub fn publish(topic: &str, message: &Message) -> Self {
        ClientFrame::Publish {
            topic: topic.to_string(),
            payload: message.payload().to_string(),
            qos: 0,
        }
    }

    pub fn subscribe(topic: &str) -> Self {
        ClientFrame::Subscribe {
            topic: topic.to_string(),
        }
    }

    pub fn encode(&self) -> Result<String, ChannelError> {
        serde_json::to_string(self).map_err(|e| ChannelError::Encode(e.to_string()))
    }
}

impl ServerFrame {
    pub fn decode(text: &str) -> Result<Self, ChannelError> {
        serde_json::from_str(text).map_err(|e| {
            ChannelError::Decode(format!(
                "{e} | {}",
                text.chars().take(100).collect::<String>()
            ))
        })
    }
}
