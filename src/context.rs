use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::domain::Errors;
use crate::persistence::StoreError;

/// Carries the caller's cancellation signal and deadline into store calls.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl RequestContext {
    pub fn new(cancel: CancellationToken, timeout: Option<Duration>) -> Self {
        RequestContext { cancel, timeout }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        RequestContext {
            cancel: CancellationToken::new(),
            timeout: Some(timeout),
        }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Drives one store operation. Cancellation or an elapsed deadline both
    /// surface as `Errors::Cancelled`; nothing is retried here.
    pub async fn run<T, F>(&self, operation: F) -> Result<T, Errors>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(Errors::Cancelled);
        }

        let guarded = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, operation)
                    .await
                    .map_err(|_| Errors::Cancelled),
                None => Ok(operation.await),
            }
        };

        let result = tokio::select! {
            _ = self.cancel.cancelled() => return Err(Errors::Cancelled),
            result = guarded => result,
        };
        Ok(result??)
    }
}
