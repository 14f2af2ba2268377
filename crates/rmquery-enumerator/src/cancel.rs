//! Cooperative cancellation for streaming sessions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

/// Shared flag a streaming worker checks at safe points.
///
/// Clones observe the same flag, so a token can be handed to another
/// thread and cancelled from there. Cancellation is one-way. A worker
/// blocked on a full queue also selects on [`signal`](Self::signal), which
/// disconnects the moment the token is cancelled.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    /// Dropped on cancellation to wake every receiver of `signal`.
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        let (trigger, signal) = crossbeam_channel::bounded(0);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            trigger: Arc::new(Mutex::new(Some(trigger))),
            signal,
        }
    }
}

impl CancellationToken {
    /// Creates an uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Returns true if this call flipped the flag.
    pub fn cancel(&self) -> bool {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.trigger.lock().take();
        true
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Channel that never carries a message and disconnects on cancellation.
    pub(crate) fn signal(&self) -> &Receiver<()> {
        &self.signal
    }
}
