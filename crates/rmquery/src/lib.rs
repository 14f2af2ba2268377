//! # rmquery
//!
//! A compiler for the XPath filter dialect spoken by resource management
//! services that are queried through WS-Enumeration.
//!
//! This crate provides:
//! - **Predicates and groups**: type-checked comparisons joined by `and`/`or`
//! - **Query forms**: root filters, reference dereferencing and hierarchy walks
//! - **Builder**: a stack-based fluent builder for nested filters
//! - **Schema adapters**: an in-memory schema and an LRU-cached wrapper
//!
//! Every value is validated against the schema when it is constructed.
//! Rendering cannot fail and always produces the same text.
//!
//! ## Usage
//!
//! ```rust
//! use rmquery::{
//!     AttributeType, ComparisonOperator, FilterExpression, Predicate, Render, StaticSchema,
//! };
//!
//! let schema = StaticSchema::new()
//!     .with_object_type("Person")
//!     .with_attribute("Age", AttributeType::Integer)
//!     .with_attribute("Manager", AttributeType::Reference);
//!
//! let age = Predicate::compare(&schema, "Age", ComparisonOperator::GreaterThan, 10).unwrap();
//! let filter = FilterExpression::new(&schema, "Person", Some(age.into())).unwrap();
//! assert_eq!(filter.render(), "/Person[(Age > 10)]");
//!
//! let managed = Predicate::present(&schema, "Manager").unwrap();
//! assert_eq!(managed.render(), "(Manager = /*)");
//! ```
//!
//! ## Operator Legality
//!
//! | Type | Legal operators |
//! |------|-----------------|
//! | Integer, DateTime | equality, ordering, presence |
//! | Boolean, Reference | equality, presence |
//! | String, Text | equality, substring, presence |
//! | Binary, Unknown | none |
//!
//! ## Presence Proxies
//!
//! The dialect has no "has a value" test, so each type uses an expression
//! that holds for every stored value:
//!
//! | Type | IsPresent |
//! |------|-----------|
//! | Reference | `(attr = /*)` |
//! | Integer | `(attr <= 9223372036854775807)` |
//! | DateTime | `(attr <= '9999-12-31T23:59:59.997')` |
//! | Boolean | `((attr = true) or (attr = false))` |
//! | String, Text | `(starts-with(attr, '%'))` |
//!
//! `IsNotPresent` wraps the same expression in `not`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod ast;
mod error;
pub mod expression;
mod group;
pub mod literal;
mod predicate;
mod render;
pub mod schema;

pub use ast::{AttributeType, ComparisonOperator, FilterValue, GroupOperator};
pub use error::{FilterError, FilterResult};
pub use expression::{
    filter_envelope, AscendantExpression, DereferencedExpression, DescendantExpression,
    FilterExpression, Query, XPathBuilder,
};
pub use group::{FilterNode, PredicateGroup};
pub use predicate::{Predicate, DATE_TIME_PRESENCE_SENTINEL, INTEGER_PRESENCE_SENTINEL};
pub use render::Render;
pub use schema::{
    AttributeDescriptor, CachedSchema, SchemaCacheConfig, SchemaCacheStats, SchemaProvider,
    StaticSchema,
};
