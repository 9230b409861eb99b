use derive_more::{Display, Error};
use crate::server::remote::error::RemoteError;

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub(crate) enum OrderError {
    /// local precondition failed, nothing was sent to the remote store
    #[display("{_0}")]
    Validation(#[error(not(source))] String),
    #[display("{_0}")]
    Remote(RemoteError),
}

impl OrderError {
    pub fn validation(message: impl Into<String>) -> Self {
        OrderError::Validation(message.into())
    }
}

impl From<RemoteError> for OrderError {
    fn from(e: RemoteError) -> Self {
        OrderError::Remote(e)
    }
}
