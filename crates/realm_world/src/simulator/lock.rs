//! InteractionLock: blocks actor movement while a modal surface is up.
//!
//! Every blocking surface holds an [`InteractionGuard`]. Movement is allowed
//! only when no guard is alive. Guards release on drop, so an early return or
//! an unwinding panic cannot leave the actor frozen.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct InteractionLock {
    holders: Arc<AtomicUsize>,
}

impl InteractionLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, reason: impl Into<String>) -> InteractionGuard {
        let reason = reason.into();
        let holders = self.holders.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(reason = %reason, holders, "interaction lock acquired");
        InteractionGuard {
            holders: Arc::clone(&self.holders),
            reason,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.holders.load(Ordering::SeqCst) > 0
    }

    pub fn holders(&self) -> usize {
        self.holders.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for InteractionLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionLock")
            .field("holders", &self.holders())
            .finish()
    }
}

impl PartialEq for InteractionLock {
    fn eq(&self, other: &Self) -> bool {
        self.holders() == other.holders()
    }
}

/// Scoped hold on an [`InteractionLock`].
pub struct InteractionGuard {
    holders: Arc<AtomicUsize>,
    reason: String,
}

impl InteractionGuard {
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Drop for InteractionGuard {
    fn drop(&mut self) {
        let previous = self.holders.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(
            reason = %self.reason,
            holders = previous.saturating_sub(1),
            "interaction lock released"
        );
    }
}

impl fmt::Debug for InteractionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionGuard")
            .field("reason", &self.reason)
            .finish()
    }
}
