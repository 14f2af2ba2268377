//! Consumption modes over one server-side cursor.
//!
//! | Session | Threads | Caller sees |
//! |---------|---------|-------------|
//! | [`SyncSession`] | caller's | records, pulled on demand |
//! | [`AsyncSession`] | one worker | records, pulled ahead into a bounded queue |
//! | [`PagedSession`] | caller's | whole pages, one Pull per call |
//!
//! All three share [`Cursor`], which owns the enumeration context, replaces
//! it on every Pull and releases it if the session is abandoned early.

mod paged;
mod streaming;
mod sync;

pub use paged::PagedSession;
pub use streaming::AsyncSession;
pub use sync::SyncSession;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{EnumerationError, EnumerationResult};
use crate::protocol::{EnumerateResponse, EnumerationContext};
use crate::traits::EnumerationTransport;

/// Single owner of an enumeration context.
pub(crate) struct Cursor<Tr: EnumerationTransport> {
    /// Transport shared with the client that opened the cursor.
    transport: Arc<Tr>,
    /// Latest context issued by the server; `None` once finished.
    context: Option<EnumerationContext>,
    /// Page size sent with every Pull.
    max_elements: u32,
    /// Count reported by Enumerate, if requested.
    total_count: Option<u64>,
    /// Set at end of sequence, after a failure, or on release.
    finished: bool,
}

impl<Tr: EnumerationTransport> Cursor<Tr> {
    /// Takes over the cursor created by an Enumerate call and returns it
    /// with the first page of items.
    pub(crate) fn open(
        transport: Arc<Tr>,
        response: EnumerateResponse<Tr::Item>,
        max_elements: u32,
    ) -> EnumerationResult<(Self, Vec<Tr::Item>)> {
        let mut cursor = Self {
            transport,
            context: None,
            max_elements,
            total_count: response.total_count,
            finished: false,
        };
        cursor.advance(response.context, response.end_of_sequence)?;
        Ok((cursor, response.items))
    }

    /// Fetches the next page.
    ///
    /// A failed Pull finishes the cursor and releases it before the error
    /// is returned.
    pub(crate) fn pull(&mut self) -> EnumerationResult<Vec<Tr::Item>> {
        let Some(context) = self.context.as_ref() else {
            return Err(EnumerationError::SequenceExhausted);
        };

        debug!(
            context = context.as_str(),
            max_elements = self.max_elements,
            "pulling next page"
        );
        match self.transport.pull(context, self.max_elements) {
            Ok(response) => {
                debug!(
                    items = response.items.len(),
                    end_of_sequence = response.end_of_sequence,
                    "pull returned"
                );
                // The previous context is superseded either way.
                self.context = None;
                self.advance(response.context, response.end_of_sequence)?;
                Ok(response.items)
            }
            Err(err) => {
                debug!(error = %err, "pull failed");
                self.release();
                Err(err)
            }
        }
    }

    /// Finishes the cursor, releasing the context if one is still held.
    pub(crate) fn release(&mut self) {
        self.finished = true;
        if let Some(context) = self.context.take() {
            release_quietly(self.transport.as_ref(), context);
        }
    }

    /// No further Pull is possible.
    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    /// Total count reported by Enumerate.
    pub(crate) fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    fn advance(
        &mut self,
        context: Option<EnumerationContext>,
        end_of_sequence: bool,
    ) -> EnumerationResult<()> {
        if end_of_sequence {
            // Exhausted cursors are gone server-side; nothing to release.
            self.finished = true;
            return Ok(());
        }

        match context {
            Some(context) => {
                self.context = Some(context);
                Ok(())
            }
            None => {
                self.finished = true;
                Err(EnumerationError::MissingContext)
            }
        }
    }
}

impl<Tr: EnumerationTransport> Drop for Cursor<Tr> {
    fn drop(&mut self) {
        if self.context.is_some() {
            debug!("releasing abandoned enumeration");
            self.release();
        }
    }
}

/// Issues Release and logs, rather than returns, any failure.
pub(crate) fn release_quietly<Tr>(transport: &Tr, context: EnumerationContext)
where
    Tr: EnumerationTransport + ?Sized,
{
    let token = context.as_str().to_string();
    debug!(context = %token, "releasing enumeration context");
    if let Err(err) = transport.release(context) {
        warn!(context = %token, error = %err, "release failed; ignoring");
    }
}
