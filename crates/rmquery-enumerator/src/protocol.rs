//! Values exchanged with the transport for the three enumeration calls.
//!
//! | Call | Request | Response |
//! |------|---------|----------|
//! | Enumerate | [`EnumerateRequest`] | [`EnumerateResponse`] |
//! | Pull | [`EnumerationContext`] + page size | [`PullResponse`] |
//! | Release | [`EnumerationContext`] | nothing |

use std::fmt;

/// Page size used when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

// =============================================================================
// Context
// =============================================================================

/// Opaque continuation token identifying a server-side cursor.
///
/// Deliberately not `Clone`: a context has one owner at a time, is
/// superseded by every Pull and is consumed by Release.
#[derive(PartialEq, Eq)]
pub struct EnumerationContext(String);

impl EnumerationContext {
    /// Wraps a token issued by the service.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token text, as it must be echoed back to the service.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwraps the token text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for EnumerationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumerationContext({})", self.0)
    }
}

impl fmt::Display for EnumerationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Server-side sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortAttribute {
    /// Attribute to sort by.
    pub attribute: String,
    /// Ascending when true.
    pub ascending: bool,
}

impl SortAttribute {
    /// Ascending sort on `attribute`.
    pub fn ascending(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            ascending: true,
        }
    }

    /// Descending sort on `attribute`.
    pub fn descending(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            ascending: false,
        }
    }
}

/// Parameters of the initial Enumerate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerateRequest {
    /// Rendered filter dialect text.
    pub filter: String,
    /// Maximum items in the first page.
    pub max_elements: u32,
    /// Attributes to return. Empty selects the service default.
    pub selection: Vec<String>,
    /// Sort keys, most significant first.
    pub sorting: Vec<SortAttribute>,
    /// Ask the service to report the total count.
    pub include_count: bool,
}

impl EnumerateRequest {
    /// Filter text wrapped in the enumeration `Filter` element.
    pub fn filter_envelope(&self) -> String {
        rmquery::filter_envelope(&self.filter)
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Answer to Enumerate.
#[derive(Debug)]
pub struct EnumerateResponse<I> {
    /// Cursor for further pulls. May be absent once the sequence has ended.
    pub context: Option<EnumerationContext>,
    /// First page of raw records.
    pub items: Vec<I>,
    /// Total number of matches, when requested.
    pub total_count: Option<u64>,
    /// No further pages exist.
    pub end_of_sequence: bool,
}

/// Answer to Pull.
#[derive(Debug)]
pub struct PullResponse<I> {
    /// Replacement cursor. The previous context must not be reused.
    pub context: Option<EnumerationContext>,
    /// Next page of raw records.
    pub items: Vec<I>,
    /// No further pages exist.
    pub end_of_sequence: bool,
}

/// One page of records, as seen by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records in server order.
    pub items: Vec<T>,
    /// Total match count, when the service reported one.
    pub total_count: Option<u64>,
    /// This was the last page.
    pub end_of_sequence: bool,
}

impl<T> Page<T> {
    /// Number of records on the page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the page carries no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
