//! Caller-facing search parameters.

use rmquery::Render;

use crate::config::{effective_page_size, EnumerationConfig};
use crate::protocol::{EnumerateRequest, SortAttribute};

/// A filtered search, before it is sent.
///
/// Settings left unset fall back to the client's [`EnumerationConfig`].
///
/// ```rust
/// use rmquery_enumerator::{SearchRequest, SortAttribute};
///
/// let request = SearchRequest::from_text("/Person[(Age > 10)]")
///     .with_page_size(50)
///     .with_attribute("DisplayName")
///     .with_sort(SortAttribute::ascending("DisplayName"));
///
/// assert_eq!(request.filter(), "/Person[(Age > 10)]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    filter: String,
    page_size: Option<i32>,
    attributes: Vec<String>,
    sort: Vec<SortAttribute>,
    include_count: Option<bool>,
}

impl SearchRequest {
    /// Searches with any compiled query, predicate or group.
    pub fn new(filter: &impl Render) -> Self {
        Self::from_text(filter.render())
    }

    /// Searches with filter text that was produced elsewhere.
    pub fn from_text(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            page_size: None,
            attributes: Vec::new(),
            sort: Vec::new(),
            include_count: None,
        }
    }

    /// Overrides the page size hint. Zero or negative selects the protocol
    /// default.
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Adds an attribute to the selection.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Replaces the selection.
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a sort key.
    pub fn with_sort(mut self, sort: SortAttribute) -> Self {
        self.sort.push(sort);
        self
    }

    /// Overrides whether the total count is requested.
    pub fn with_include_count(mut self, include_count: bool) -> Self {
        self.include_count = Some(include_count);
        self
    }

    /// Filter dialect text.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Selected attributes.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Sort keys.
    pub fn sort(&self) -> &[SortAttribute] {
        &self.sort
    }

    /// Page size actually sent, after applying `config`.
    pub fn max_elements(&self, config: &EnumerationConfig) -> u32 {
        self.page_size
            .map(effective_page_size)
            .unwrap_or_else(|| config.max_elements())
    }

    pub(crate) fn to_enumerate(&self, config: &EnumerationConfig) -> EnumerateRequest {
        EnumerateRequest {
            filter: self.filter.clone(),
            max_elements: self.max_elements(config),
            selection: self.attributes.clone(),
            sorting: self.sort.clone(),
            include_count: self.include_count.unwrap_or(config.include_count),
        }
    }
}

impl From<&rmquery::Query> for SearchRequest {
    fn from(query: &rmquery::Query) -> Self {
        Self::new(query)
    }
}

impl From<rmquery::Query> for SearchRequest {
    fn from(query: rmquery::Query) -> Self {
        Self::new(&query)
    }
}
