use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::error::BuildError;

/// Best-effort cancellation signal polled by the stub builder.
#[derive(Debug, Default, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub(crate) fn check(token: Option<&CancellationToken>) -> Result<(), BuildError> {
        match token {
            Some(token) if token.is_cancelled() => Err(BuildError::Cancelled),
            _ => Ok(()),
        }
    }
}
