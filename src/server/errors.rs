use log::error;

use crate::repo::{ErrorKind, FacadeError};

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("facade error :: {0}")]
    FacadeError(#[from] FacadeError),
    #[error("bad tweet id :: {0}")]
    BadTweetId(#[from] uuid::Error),
    #[error("missing user identifier")]
    MissingUser,
}

impl From<ServerError> for tonic::Status {
    fn from(value: ServerError) -> Self {
        let msg = value.to_string();
        match value {
            ServerError::FacadeError(e) => match e.kind() {
                ErrorKind::NotFound => tonic::Status::not_found(msg),
                ErrorKind::PermissionDenied => tonic::Status::permission_denied(msg),
                ErrorKind::InvalidCursor => tonic::Status::invalid_argument(msg),
                ErrorKind::Canceled => tonic::Status::cancelled(msg),
                ErrorKind::DeadlineExceeded => tonic::Status::deadline_exceeded(msg),
                ErrorKind::StorageFailure => {
                    error!("{}", msg);
                    tonic::Status::internal(msg)
                }
            },
            ServerError::BadTweetId(_) | ServerError::MissingUser => {
                tonic::Status::invalid_argument(msg)
            }
        }
    }
}
