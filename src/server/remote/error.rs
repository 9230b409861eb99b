use derive_more::{Display, Error};

/// Any failure reported across the remote boundary: transport, timeout,
/// constraint or authorization rejection, locked session, or a response
/// that does not match the expected shape. `message` is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{message}")]
pub(crate) struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return RemoteError::new(format!("remote request timed out: {}", e));
        }
        RemoteError::new(e.to_string())
    }
}
