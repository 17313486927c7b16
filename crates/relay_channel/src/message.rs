//! The message envelope.
//!
//! A `Message` carries a single string payload. How it is framed on the
//! wire is up to the binder; see `frame` for the broker encoding.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    payload: String,
}

impl Message {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl From<String> for Message {
    fn from(payload: String) -> Self {
        Message::new(payload)
    }
}

impl From<&str> for Message {
    fn from(payload: &str) -> Self {
        Message::new(payload)
    }
}
