//! Lazy, caller-thread enumeration.

use std::iter::FusedIterator;
use std::vec;

use tracing::trace;

use super::Cursor;
use crate::error::EnumerationResult;
use crate::traits::{EnumerationTransport, RecordDecoder};

/// Iterator that pulls the next page only when the current one is used up.
///
/// Every Pull blocks the calling thread. The first error is yielded once,
/// after which the iterator is fused. Dropping the session before the end
/// of the sequence releases the cursor.
pub struct SyncSession<Tr: EnumerationTransport, D> {
    cursor: Cursor<Tr>,
    decoder: D,
    buffer: vec::IntoIter<Tr::Item>,
    failed: bool,
}

impl<Tr, D> SyncSession<Tr, D>
where
    Tr: EnumerationTransport,
    D: RecordDecoder<Tr::Item>,
{
    pub(crate) fn new(cursor: Cursor<Tr>, initial: Vec<Tr::Item>, decoder: D) -> Self {
        Self {
            cursor,
            decoder,
            buffer: initial.into_iter(),
            failed: false,
        }
    }

    /// Total match count, if the service reported one.
    pub fn total_count(&self) -> Option<u64> {
        self.cursor.total_count()
    }

    /// Items already fetched but not yet yielded.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true once nothing more will be yielded.
    pub fn is_finished(&self) -> bool {
        self.failed || (self.buffer.as_slice().is_empty() && self.cursor.is_finished())
    }

    fn fail(&mut self) {
        self.failed = true;
        self.buffer = Vec::new().into_iter();
        self.cursor.release();
    }
}

impl<Tr, D> Iterator for SyncSession<Tr, D>
where
    Tr: EnumerationTransport,
    D: RecordDecoder<Tr::Item>,
{
    type Item = EnumerationResult<D::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            if let Some(item) = self.buffer.next() {
                return match self.decoder.decode(item) {
                    Ok(record) => Some(Ok(record)),
                    Err(err) => {
                        self.fail();
                        Some(Err(err))
                    }
                };
            }

            if self.cursor.is_finished() {
                return None;
            }

            match self.cursor.pull() {
                Ok(items) => {
                    trace!(items = items.len(), "buffered next page");
                    self.buffer = items.into_iter();
                }
                Err(err) => {
                    self.fail();
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<Tr, D> FusedIterator for SyncSession<Tr, D>
where
    Tr: EnumerationTransport,
    D: RecordDecoder<Tr::Item>,
{
}
