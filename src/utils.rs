use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::repo::FacadeError;

/// Runs `fut` until it completes, `cancel` fires or `timeout` elapses.
///
/// The future is dropped as soon as the token is cancelled or the deadline
/// expires; writes already committed by it are not rolled back.
pub async fn guarded<T, F>(
    cancel: &CancellationToken,
    timeout: Option<Duration>,
    fut: F,
) -> Result<T, FacadeError>
where
    F: Future<Output = Result<T, FacadeError>>,
{
    let bounded = async {
        match timeout {
            Some(timeout) => match tokio::time::timeout(timeout, fut).await {
                Ok(res) => res,
                Err(_) => Err(FacadeError::DeadlineExceeded),
            },
            None => fut.await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FacadeError::Canceled),
        res = bounded => res,
    }
}
