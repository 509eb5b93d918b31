use {
    super::error::InvokeError,
    std::{future, time::Duration},
    tokio::{sync::watch, time::Instant},
};

/// Caller-held side of a cancellable [`RequestContext`].
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Cancellation flag and optional deadline passed through to `invoke`.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Never cancelled, no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn new() -> (CancelHandle, Self) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancel: Some(rx),
            deadline: None,
        };
        (CancelHandle(tx), ctx)
    }

    /// Keeps the earlier of the existing and the new deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// `Err` with the reason once the context is cancelled or expired.
    pub fn check(&self) -> Result<(), InvokeError> {
        if self.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Err(InvokeError::Cancelled);
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(InvokeError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Resolves once the context is cancelled or its deadline passes.
    /// Pending forever for a background context.
    pub async fn done(&self) -> InvokeError {
        let cancelled = async {
            if let Some(rx) = &self.cancel {
                let mut rx = rx.clone();
                if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                    return;
                }
            }
            // Handle dropped without cancelling.
            future::pending::<()>().await
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = cancelled => InvokeError::Cancelled,
            _ = expired => InvokeError::DeadlineExceeded,
        }
    }
}
