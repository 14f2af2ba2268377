//! Background enumeration into a bounded queue.
//!
//! One worker thread owns the cursor. It hands decoded records to the
//! consumer through a bounded crossbeam channel, so the queue capacity
//! limits read-ahead: the worker blocks on a full queue before it issues
//! the next Pull.
//!
//! The worker checks for cancellation before each Pull and when a page
//! arrives. While blocked on a full queue it selects over the queue and the
//! token's signal, so cancelling wakes it at once. A dropped consumer
//! counts as cancellation. On cancellation the worker
//! releases the cursor once and exits; exiting drops the sender, which is
//! what ends the consumer's iteration.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{select, Receiver, Sender};
use tracing::{debug, trace};

use super::Cursor;
use crate::cancel::CancellationToken;
use crate::config::EnumerationConfig;
use crate::error::{EnumerationError, EnumerationResult};
use crate::traits::{EnumerationTransport, RecordDecoder};

const WORKER_THREAD_NAME: &str = "rmquery-enumeration";

/// Records streamed from a background worker.
///
/// Iterating blocks until the worker queues a record or exits. Dropping the
/// session cancels the worker without waiting for it; use
/// [`wait`](Self::wait) to wait for it to finish its cleanup.
pub struct AsyncSession<T> {
    receiver: Receiver<EnumerationResult<T>>,
    token: CancellationToken,
    /// Taken by `wait`; never joined on drop.
    worker: Option<JoinHandle<()>>,
    total_count: Option<u64>,
}

impl<T: Send + 'static> AsyncSession<T> {
    pub(crate) fn spawn<Tr, D>(
        cursor: Cursor<Tr>,
        initial: Vec<Tr::Item>,
        decoder: D,
        config: &EnumerationConfig,
    ) -> EnumerationResult<Self>
    where
        Tr: EnumerationTransport + 'static,
        D: RecordDecoder<Tr::Item, Output = T> + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(config.queue_capacity.max(1));
        let token = CancellationToken::new();
        let total_count = cursor.total_count();

        let worker = Worker {
            cursor,
            decoder,
            sender,
            token: token.clone(),
        };

        // If spawning fails the worker is dropped here, which releases the cursor.
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || worker.run(initial))
            .map_err(EnumerationError::WorkerSpawn)?;

        Ok(Self {
            receiver,
            token,
            worker: Some(handle),
            total_count,
        })
    }
}

impl<T> AsyncSession<T> {
    /// Total match count, if the service reported one.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Asks the worker to stop. Records already queued can still be read.
    pub fn cancel(&self) {
        if self.token.cancel() {
            debug!("enumeration cancelled by consumer");
        }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token that cancels this session from another thread.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Records queued and not yet read.
    pub fn buffered(&self) -> usize {
        self.receiver.len()
    }

    /// Whether the worker thread has exited.
    pub fn is_worker_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancels the worker if it is still running and waits for it to exit.
    ///
    /// Returns the worker's panic payload if it panicked.
    pub fn wait(mut self) -> thread::Result<()> {
        self.token.cancel();
        match self.worker.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}

impl<T> Iterator for AsyncSession<T> {
    type Item = EnumerationResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.receiver.recv().ok();
        if record.is_some() {
            trace!("record dequeued");
        }
        record
    }
}

impl<T> Drop for AsyncSession<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

// =============================================================================
// Worker
// =============================================================================

struct Worker<Tr: EnumerationTransport, D: RecordDecoder<Tr::Item>> {
    /// Cursor this worker pulls from; nothing else touches it.
    cursor: Cursor<Tr>,
    /// Turns raw items into queued records.
    decoder: D,
    /// Producer side of the bounded queue. Dropping it ends the consumer's
    /// iteration.
    sender: Sender<EnumerationResult<D::Output>>,
    /// Shared with the session and any handed-out clones.
    token: CancellationToken,
}

impl<Tr, D> Worker<Tr, D>
where
    Tr: EnumerationTransport,
    D: RecordDecoder<Tr::Item>,
{
    fn run(mut self, initial: Vec<Tr::Item>) {
        debug!("enumeration worker started");
        let mut page = initial;

        loop {
            if !self.deliver(page) {
                self.cursor.release();
                return;
            }

            if self.cursor.is_finished() {
                debug!("enumeration worker reached end of sequence");
                return;
            }

            if self.token.is_cancelled() {
                debug!("enumeration worker cancelled before pull");
                self.cursor.release();
                return;
            }

            match self.cursor.pull() {
                Ok(items) => page = items,
                Err(err) => {
                    // The cursor has already released itself.
                    self.send(Err(err));
                    return;
                }
            }
        }
    }

    /// Queues a page. Returns false if the worker must stop.
    fn deliver(&self, items: Vec<Tr::Item>) -> bool {
        if self.token.is_cancelled() {
            debug!("enumeration worker cancelled after page");
            return false;
        }

        for item in items {
            let record = self.decoder.decode(item);
            let failed = record.is_err();
            if !self.send(record) {
                return false;
            }
            if failed {
                debug!("decode failed; stopping enumeration");
                return false;
            }
            trace!("record queued");
        }
        true
    }

    /// Blocks until the record is queued, the session is cancelled or the
    /// consumer is gone. Returns true only in the first case.
    fn send(&self, record: EnumerationResult<D::Output>) -> bool {
        if self.token.is_cancelled() {
            debug!("enumeration worker cancelled before queueing");
            return false;
        }

        select! {
            send(self.sender, record) -> sent => {
                if sent.is_err() {
                    debug!("enumeration consumer dropped");
                }
                sent.is_ok()
            },
            recv(self.token.signal()) -> _ => {
                debug!("enumeration worker cancelled while queue was full");
                false
            },
        }
    }
}
