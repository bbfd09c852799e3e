use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;

/// Cancellable handle for a scheduled poll retry chain.
///
/// Dropping the handle does not cancel the chain; call [`RetryHandle::cancel`].
#[derive(Debug, Clone)]
pub struct RetryHandle {
    abort: AbortHandle,
    delay: Duration,
}

impl RetryHandle {
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }

    /// Delay between two polls of this chain.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Runs `step` every `delay` until it returns `false`.
///
/// Each step completes before the next delay starts, so steps never overlap.
pub fn spawn_retry_chain<F, Fut>(delay: Duration, mut step: F) -> RetryHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    let task = tokio::spawn(async move {
        loop {
            tokio::time::sleep(delay).await;
            if !step().await {
                break;
            }
        }
    });
    RetryHandle {
        abort: task.abort_handle(),
        delay,
    }
}
