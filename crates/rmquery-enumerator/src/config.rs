//! Configuration types for enumeration.

use crate::protocol::DEFAULT_PAGE_SIZE;

/// Default capacity of the streaming session queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Configuration for an [`EnumerationClient`](crate::EnumerationClient).
///
/// # Example
///
/// ```rust
/// use rmquery_enumerator::EnumerationConfig;
///
/// let config = EnumerationConfig::builder()
///     .with_page_size(100)
///     .with_queue_capacity(500)
///     .with_include_count(true)
///     .build();
///
/// assert_eq!(config.max_elements(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct EnumerationConfig {
    /// Page size hint sent with every Enumerate and Pull. Zero and negative
    /// values select the protocol default of 200.
    pub page_size: i32,
    /// Bound on items buffered ahead of a streaming consumer.
    pub queue_capacity: usize,
    /// Ask the service for the total result count.
    pub include_count: bool,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            page_size: -1,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            include_count: false,
        }
    }
}

impl EnumerationConfig {
    /// Creates a new builder for EnumerationConfig.
    pub fn builder() -> EnumerationConfigBuilder {
        EnumerationConfigBuilder::default()
    }

    /// Page size actually sent on the wire.
    pub fn max_elements(&self) -> u32 {
        effective_page_size(self.page_size)
    }
}

/// Resolves a page size hint, substituting the protocol default for
/// negative values and zero.
///
/// A zero-sized Pull never advances a cursor, so only
/// [`EnumerationClient::count`](crate::EnumerationClient::count) sends 0.
pub fn effective_page_size(hint: i32) -> u32 {
    u32::try_from(hint)
        .ok()
        .filter(|&size| size > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Builder for EnumerationConfig.
#[derive(Debug, Clone, Default)]
pub struct EnumerationConfigBuilder {
    page_size: Option<i32>,
    queue_capacity: Option<usize>,
    include_count: bool,
}

impl EnumerationConfigBuilder {
    /// Sets the page size hint.
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets the streaming queue capacity. Zero is raised to one.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Requests total counts from the service.
    pub fn with_include_count(mut self, include_count: bool) -> Self {
        self.include_count = include_count;
        self
    }

    /// Builds the EnumerationConfig.
    pub fn build(self) -> EnumerationConfig {
        let defaults = EnumerationConfig::default();
        EnumerationConfig {
            page_size: self.page_size.unwrap_or(defaults.page_size),
            queue_capacity: self
                .queue_capacity
                .unwrap_or(defaults.queue_capacity)
                .max(1),
            include_count: self.include_count,
        }
    }
}
