//! Complete queries over object types.
//!
//! A query binds an object type to a filter tree and optionally walks a
//! reference or a hierarchy from the matches:
//!
//! | Type | Shape |
//! |------|-------|
//! | [`FilterExpression`] | `/Person[(Age > 10)]` |
//! | [`DereferencedExpression`] | `/Person[(Age > 10)]/Manager` |
//! | [`AscendantExpression`] | `descendants(/Group[...], 'ParentGroup')` |
//! | [`DescendantExpression`] | `/Group[descendant-in('ParentGroup', /Group[...])]` |
//!
//! All four are unified under [`Query`], which is also what a Reference
//! predicate accepts as a relational sub-query value.

mod builder;
mod filter;
mod traversal;

pub use builder::XPathBuilder;
pub use filter::{DereferencedExpression, FilterExpression};
pub use traversal::{AscendantExpression, DescendantExpression};

use std::fmt;

use crate::literal::escape_xml;
use crate::render::Render;

/// Namespace of the enumeration `Filter` element.
pub const ENUMERATION_NAMESPACE: &str = "http://schemas.xmlsoap.org/ws/2004/09/enumeration";

/// Dialect URI identifying the XPath filter language.
pub const XPATH_FILTER_DIALECT: &str = "http://schemas.microsoft.com/2006/11/XPathFilterDialect";

/// Any complete query.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// `/Type[filter]`
    Filter(FilterExpression),
    /// `/Type[filter]/Attribute`
    Dereferenced(DereferencedExpression),
    /// Upward hierarchy walk.
    Ascendant(AscendantExpression),
    /// Downward hierarchy walk.
    Descendant(DescendantExpression),
}

impl Query {
    /// Object type the query selects from.
    pub fn object_type(&self) -> &str {
        match self {
            Query::Filter(q) => q.object_type(),
            Query::Dereferenced(q) => q.filter().object_type(),
            Query::Ascendant(q) => q.object_type(),
            Query::Descendant(q) => q.object_type(),
        }
    }

    /// Wraps the rendered query in the enumeration filter envelope.
    pub fn to_filter_envelope(&self) -> String {
        filter_envelope(&self.render())
    }
}

/// Wraps dialect text in the enumeration `Filter` element.
pub fn filter_envelope(filter_text: &str) -> String {
    format!(
        "<Filter xmlns=\"{ENUMERATION_NAMESPACE}\" Dialect=\"{XPATH_FILTER_DIALECT}\">{}</Filter>",
        escape_xml(filter_text)
    )
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Filter(q) => fmt::Display::fmt(q, f),
            Query::Dereferenced(q) => fmt::Display::fmt(q, f),
            Query::Ascendant(q) => fmt::Display::fmt(q, f),
            Query::Descendant(q) => fmt::Display::fmt(q, f),
        }
    }
}

impl Render for Query {}

impl From<FilterExpression> for Query {
    fn from(q: FilterExpression) -> Self {
        Query::Filter(q)
    }
}

impl From<DereferencedExpression> for Query {
    fn from(q: DereferencedExpression) -> Self {
        Query::Dereferenced(q)
    }
}

impl From<AscendantExpression> for Query {
    fn from(q: AscendantExpression) -> Self {
        Query::Ascendant(q)
    }
}

impl From<DescendantExpression> for Query {
    fn from(q: DescendantExpression) -> Self {
        Query::Descendant(q)
    }
}
