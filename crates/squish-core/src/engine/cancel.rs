//! Cooperative cancellation polled between encode attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A signal the engine polls at the top of each loop iteration.
///
/// A single encode call is never interrupted; cancellation takes effect before
/// the next attempt starts.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

/// A signal that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Cancellation for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<C: Cancellation + ?Sized> Cancellation for Arc<C> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}
