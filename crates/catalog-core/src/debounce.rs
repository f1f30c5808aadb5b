use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Single-slot cancellable timer.
///
/// Each [`schedule`](Debouncer::schedule) replaces whatever was pending, so only the last
/// action of a burst runs, `window` after it was scheduled. Must be used inside a tokio runtime.
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let window = self.window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            action.await;
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.replace(handle) {
            trace!("Debouncer: superseding pending action");
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.take() {
            trace!("Debouncer: cancelled pending action");
            previous.abort();
        }
    }

    /// Whether an action is scheduled and has not finished yet
    pub fn is_pending(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the pending action (if any) to run to completion
    pub async fn flush(&self) {
        let handle = {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            pending.take()
        };
        if let Some(handle) = handle {
            // An aborted task resolves with a cancellation error; nothing to report
            let _ = handle.await;
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}
