//! Caller-paced, page-at-a-time enumeration.

use super::Cursor;
use crate::error::{EnumerationError, EnumerationResult};
use crate::protocol::Page;
use crate::traits::{EnumerationTransport, RecordDecoder};

/// Explicit page-by-page walk over a cursor.
///
/// The first [`next_page`](Self::next_page) returns the page that came
/// back with Enumerate. Every later call issues exactly one Pull. Once the
/// last page has been returned, [`has_more_items`](Self::has_more_items)
/// is false and further calls fail with
/// [`EnumerationError::SequenceExhausted`].
pub struct PagedSession<Tr: EnumerationTransport, D> {
    cursor: Cursor<Tr>,
    decoder: D,
    /// Items carried by the Enumerate response, handed out by the first call.
    initial: Option<Vec<Tr::Item>>,
    /// False once the end-of-sequence page has been returned or a call failed.
    has_more: bool,
    pages_returned: usize,
}

impl<Tr, D> PagedSession<Tr, D>
where
    Tr: EnumerationTransport,
    D: RecordDecoder<Tr::Item>,
{
    pub(crate) fn new(cursor: Cursor<Tr>, initial: Vec<Tr::Item>, decoder: D) -> Self {
        Self {
            cursor,
            decoder,
            initial: Some(initial),
            has_more: true,
            pages_returned: 0,
        }
    }

    /// Whether another call to `next_page` will return a page.
    pub fn has_more_items(&self) -> bool {
        self.has_more
    }

    /// Total match count, if the service reported one.
    pub fn total_count(&self) -> Option<u64> {
        self.cursor.total_count()
    }

    /// Pages returned so far.
    pub fn pages_returned(&self) -> usize {
        self.pages_returned
    }

    /// Returns the next page of decoded records.
    pub fn next_page(&mut self) -> EnumerationResult<Page<D::Output>> {
        if !self.has_more {
            return Err(EnumerationError::SequenceExhausted);
        }

        let raw = match self.initial.take() {
            Some(items) => items,
            None => match self.cursor.pull() {
                Ok(items) => items,
                Err(err) => {
                    self.has_more = false;
                    return Err(err);
                }
            },
        };

        let decoder = &self.decoder;
        let decoded = raw
            .into_iter()
            .map(|item| decoder.decode(item))
            .collect::<EnumerationResult<Vec<_>>>();
        let items = match decoded {
            Ok(items) => items,
            Err(err) => {
                self.has_more = false;
                self.cursor.release();
                return Err(err);
            }
        };

        self.pages_returned += 1;
        self.has_more = !self.cursor.is_finished();
        Ok(Page {
            items,
            total_count: self.cursor.total_count(),
            end_of_sequence: !self.has_more,
        })
    }
}

impl<Tr, D> Iterator for PagedSession<Tr, D>
where
    Tr: EnumerationTransport,
    D: RecordDecoder<Tr::Item>,
{
    type Item = EnumerationResult<Page<D::Output>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.has_more.then(|| self.next_page())
    }
}
