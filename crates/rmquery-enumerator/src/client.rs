//! Main enumeration client.

use std::sync::Arc;

use tracing::debug;

use crate::config::{effective_page_size, EnumerationConfig};
use crate::error::{EnumerationError, EnumerationResult};
use crate::protocol::{EnumerateRequest, EnumerateResponse, EnumerationContext, PullResponse};
use crate::request::SearchRequest;
use crate::session::{release_quietly, AsyncSession, Cursor, PagedSession, SyncSession};
use crate::traits::{EnumerationTransport, RecordDecoder};

/// Drives the Enumerate / Pull / Release protocol over a transport.
///
/// # Example
///
/// ```ignore
/// use rmquery_enumerator::{EnumerationClient, EnumerationConfig, SearchRequest};
///
/// let client = EnumerationClient::with_config(
///     transport,
///     EnumerationConfig::builder().with_page_size(100).build(),
/// );
///
/// let request = SearchRequest::new(&query).with_attribute("DisplayName");
/// for person in client.search(&request, decode_person)? {
///     println!("{}", person?.display_name);
/// }
/// ```
pub struct EnumerationClient<Tr> {
    transport: Arc<Tr>,
    config: EnumerationConfig,
}

impl<Tr> Clone for EnumerationClient<Tr> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: self.config.clone(),
        }
    }
}

impl<Tr: EnumerationTransport> EnumerationClient<Tr> {
    /// Creates a client with the default configuration.
    pub fn new(transport: Tr) -> Self {
        Self::with_config(transport, EnumerationConfig::default())
    }

    /// Creates a client with a custom configuration.
    pub fn with_config(transport: Tr, config: EnumerationConfig) -> Self {
        Self::from_shared(Arc::new(transport), config)
    }

    /// Creates a client over a transport that is shared with other code.
    pub fn from_shared(transport: Arc<Tr>, config: EnumerationConfig) -> Self {
        Self { transport, config }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &EnumerationConfig {
        &self.config
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &Tr {
        &self.transport
    }

    // =========================================================================
    // Protocol calls
    // =========================================================================

    /// Issues a raw Enumerate call.
    ///
    /// The caller owns the returned context and must pull or release it.
    pub fn enumerate(
        &self,
        request: &SearchRequest,
    ) -> EnumerationResult<EnumerateResponse<Tr::Item>> {
        self.send_enumerate(&request.to_enumerate(&self.config))
    }

    /// Issues a raw Pull call. A zero or negative `page_size` selects the default.
    pub fn pull(
        &self,
        context: &EnumerationContext,
        page_size: i32,
    ) -> EnumerationResult<PullResponse<Tr::Item>> {
        let max_elements = effective_page_size(page_size);
        debug!(context = context.as_str(), max_elements, "pull");
        self.transport.pull(context, max_elements)
    }

    /// Releases a cursor. Failures are logged and otherwise ignored.
    pub fn release(&self, context: EnumerationContext) {
        release_quietly(self.transport.as_ref(), context);
    }

    /// Counts matches without fetching any records.
    ///
    /// Enumerates with a page size of zero and the count requested, then
    /// releases the cursor.
    pub fn count(&self, request: &SearchRequest) -> EnumerationResult<u64> {
        let mut enumerate = request.to_enumerate(&self.config);
        enumerate.max_elements = 0;
        enumerate.include_count = true;

        let response = self.send_enumerate(&enumerate)?;
        if let Some(context) = response.context {
            if !response.end_of_sequence {
                self.release(context);
            }
        }

        response
            .total_count
            .ok_or_else(|| EnumerationError::Decode("response carried no total count".to_string()))
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Searches lazily on the calling thread.
    pub fn search<D>(
        &self,
        request: &SearchRequest,
        decoder: D,
    ) -> EnumerationResult<SyncSession<Tr, D>>
    where
        D: RecordDecoder<Tr::Item>,
    {
        let (cursor, initial) = self.open(request)?;
        Ok(SyncSession::new(cursor, initial, decoder))
    }

    /// Searches one page at a time under the caller's control.
    pub fn search_paged<D>(
        &self,
        request: &SearchRequest,
        decoder: D,
    ) -> EnumerationResult<PagedSession<Tr, D>>
    where
        D: RecordDecoder<Tr::Item>,
    {
        let (cursor, initial) = self.open(request)?;
        Ok(PagedSession::new(cursor, initial, decoder))
    }

    fn open(&self, request: &SearchRequest) -> EnumerationResult<(Cursor<Tr>, Vec<Tr::Item>)> {
        let enumerate = request.to_enumerate(&self.config);
        let response = self.send_enumerate(&enumerate)?;
        Cursor::open(Arc::clone(&self.transport), response, enumerate.max_elements)
    }

    fn send_enumerate(
        &self,
        request: &EnumerateRequest,
    ) -> EnumerationResult<EnumerateResponse<Tr::Item>> {
        debug!(
            filter = %request.filter,
            max_elements = request.max_elements,
            include_count = request.include_count,
            "enumerate"
        );
        let response = self.transport.enumerate(request)?;
        debug!(
            items = response.items.len(),
            total_count = ?response.total_count,
            end_of_sequence = response.end_of_sequence,
            "enumerate returned"
        );
        Ok(response)
    }
}

impl<Tr: EnumerationTransport + 'static> EnumerationClient<Tr> {
    /// Searches on a background worker that reads ahead into a bounded
    /// queue of `queue_capacity` records.
    pub fn search_streaming<D>(
        &self,
        request: &SearchRequest,
        decoder: D,
    ) -> EnumerationResult<AsyncSession<D::Output>>
    where
        D: RecordDecoder<Tr::Item> + 'static,
        D::Output: Send + 'static,
    {
        let (cursor, initial) = self.open(request)?;
        AsyncSession::spawn(cursor, initial, decoder, &self.config)
    }
}
