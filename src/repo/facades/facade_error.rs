use crate::types;

#[derive(thiserror::Error, Debug)]
pub enum FacadeError {
    #[error("unable to find data: {0}")]
    NotFound(String),
    #[error("user `{user}` is not the author of tweet `{tweet_id}`")]
    PermissionDenied {
        tweet_id: types::TweetId,
        user: types::UserId,
    },
    #[error("invalid pagination cursor :: {0}")]
    InvalidCursor(#[from] types::CursorError),
    #[error("repository error :: {0}")]
    RepositoryError(#[from] crate::repo::Error),
    #[error("store error :: {0}")]
    StoreError(#[from] crate::store::Error),
    #[error("operation canceled")]
    Canceled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Classification of facade failures exposed to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    InvalidCursor,
    StorageFailure,
    Canceled,
    DeadlineExceeded,
}

impl FacadeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::StoreError(crate::store::Error::NotFound(_)) => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::InvalidCursor(_) => ErrorKind::InvalidCursor,
            Self::RepositoryError(_) | Self::StoreError(_) => ErrorKind::StorageFailure,
            Self::Canceled => ErrorKind::Canceled,
            Self::DeadlineExceeded => ErrorKind::DeadlineExceeded,
        }
    }
}
