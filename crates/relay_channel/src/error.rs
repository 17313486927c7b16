use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// The broker could not be reached or refused the connection.
    #[error("broker unavailable: {0}")]
    Unavailable(String),
    /// The broker answered with an `error` frame and hung up.
    #[error("broker rejected the connection: {0}")]
    Rejected(String),
    #[error("channel closed")]
    Closed,
    #[error("failed to decode frame: {0}")]
    Decode(String),
    #[error("failed to encode frame: {0}")]
    Encode(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl ChannelError {
    /// True when the broker side is gone, as opposed to a bad message.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ChannelError::Unavailable(_) | ChannelError::Rejected(_) | ChannelError::Closed
        )
    }

    /// A decode failure only spoils one frame; the channel stays usable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ChannelError::Decode(_))
    }
}

impl From<tungstenite::Error> for ChannelError {
    fn from(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                ChannelError::Closed
            }
            tungstenite::Error::Io(e) => ChannelError::Unavailable(e.to_string()),
            other => ChannelError::Transport(other.to_string()),
        }
    }
}
