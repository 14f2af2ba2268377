//! Schema lookups used while constructing filters.
//!
//! This module defines the [`SchemaProvider`] trait. Filters consult the
//! schema once, at construction time, to learn each attribute's type and
//! multiplicity and to validate object type names. Rendering never touches
//! the schema.
//!
//! # Example: Implementing SchemaProvider over a remote schema
//!
//! ```ignore
//! use rmquery::{AttributeDescriptor, SchemaProvider};
//!
//! impl SchemaProvider for RemoteSchema {
//!     fn describe_attribute(&self, name: &str) -> Option<AttributeDescriptor> {
//!         self.attribute_definitions.get(name).map(|d| d.to_descriptor())
//!     }
//!
//!     fn has_object_type(&self, name: &str) -> bool {
//!         self.object_types.contains_key(name)
//!     }
//! }
//! ```

mod cache;

pub use cache::{CachedSchema, SchemaCacheConfig, SchemaCacheStats};

use std::collections::{HashMap, HashSet};

use crate::ast::AttributeType;
use crate::error::{FilterError, FilterResult};
use crate::literal::{self, WILDCARD_OBJECT_TYPE};

/// Schema facts about one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeDescriptor {
    /// System name of the attribute.
    pub name: String,
    /// Declared type.
    pub attribute_type: AttributeType,
    /// Whether the attribute holds more than one value.
    pub multivalued: bool,
}

impl AttributeDescriptor {
    /// Creates a single-valued descriptor.
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            multivalued: false,
        }
    }

    /// Marks the attribute as multivalued.
    pub fn multivalued(mut self) -> Self {
        self.multivalued = true;
        self
    }
}

/// Source of attribute and object type definitions.
///
/// # Required Methods
///
/// - [`describe_attribute`](Self::describe_attribute) - Look up an attribute by name
/// - [`has_object_type`](Self::has_object_type) - Check an object type exists
///
/// The remaining methods are derived from those two and rarely need to be
/// overridden.
pub trait SchemaProvider: Send + Sync {
    /// Returns the definition of an attribute, or `None` if it is unknown.
    fn describe_attribute(&self, name: &str) -> Option<AttributeDescriptor>;

    /// Checks if an object type exists.
    fn has_object_type(&self, name: &str) -> bool;

    /// Declared type of an attribute.
    fn attribute_type(&self, name: &str) -> FilterResult<AttributeType> {
        self.resolve_attribute(name).map(|d| d.attribute_type)
    }

    /// Whether an attribute is multivalued.
    fn is_multivalued(&self, name: &str) -> FilterResult<bool> {
        self.resolve_attribute(name).map(|d| d.multivalued)
    }

    /// Checks the attribute name is well formed and defined.
    fn validate_attribute_name(&self, name: &str) -> FilterResult<()> {
        self.resolve_attribute(name).map(|_| ())
    }

    /// Checks the object type name is well formed and defined.
    ///
    /// The `*` wildcard is always accepted without a lookup.
    fn validate_object_type_name(&self, name: &str) -> FilterResult<()> {
        literal::validate_object_type(name)?;
        if name == WILDCARD_OBJECT_TYPE || self.has_object_type(name) {
            Ok(())
        } else {
            Err(FilterError::UnknownObjectType(name.to_string()))
        }
    }

    /// Validates the name and returns the attribute definition.
    fn resolve_attribute(&self, name: &str) -> FilterResult<AttributeDescriptor> {
        literal::validate_name(name)?;
        self.describe_attribute(name)
            .ok_or_else(|| FilterError::UnknownAttribute(name.to_string()))
    }
}

impl<S: SchemaProvider + ?Sized> SchemaProvider for &S {
    fn describe_attribute(&self, name: &str) -> Option<AttributeDescriptor> {
        (**self).describe_attribute(name)
    }

    fn has_object_type(&self, name: &str) -> bool {
        (**self).has_object_type(name)
    }
}

impl<S: SchemaProvider + ?Sized> SchemaProvider for std::sync::Arc<S> {
    fn describe_attribute(&self, name: &str) -> Option<AttributeDescriptor> {
        (**self).describe_attribute(name)
    }

    fn has_object_type(&self, name: &str) -> bool {
        (**self).has_object_type(name)
    }
}

// =============================================================================
// In-memory schema
// =============================================================================

/// Schema held entirely in memory.
///
/// Useful for tests and for callers that load the schema once up front.
///
/// ```rust
/// use rmquery::{AttributeType, SchemaProvider, StaticSchema};
///
/// let schema = StaticSchema::new()
///     .with_object_type("Person")
///     .with_attribute("AccountName", AttributeType::String)
///     .with_multivalued_attribute("ProxyAddressCollection", AttributeType::String);
///
/// assert!(schema.has_object_type("Person"));
/// assert!(schema.is_multivalued("ProxyAddressCollection").unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    attributes: HashMap<String, AttributeDescriptor>,
    object_types: HashSet<String>,
}

impl StaticSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object type.
    pub fn with_object_type(mut self, name: impl Into<String>) -> Self {
        self.object_types.insert(name.into());
        self
    }

    /// Adds a single-valued attribute.
    pub fn with_attribute(self, name: impl Into<String>, attribute_type: AttributeType) -> Self {
        self.with_descriptor(AttributeDescriptor::new(name, attribute_type))
    }

    /// Adds a multivalued attribute.
    pub fn with_multivalued_attribute(
        self,
        name: impl Into<String>,
        attribute_type: AttributeType,
    ) -> Self {
        self.with_descriptor(AttributeDescriptor::new(name, attribute_type).multivalued())
    }

    /// Adds an attribute definition.
    pub fn with_descriptor(mut self, descriptor: AttributeDescriptor) -> Self {
        self.attributes.insert(descriptor.name.clone(), descriptor);
        self
    }

    /// Number of attribute definitions.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

impl SchemaProvider for StaticSchema {
    fn describe_attribute(&self, name: &str) -> Option<AttributeDescriptor> {
        self.attributes.get(name).cloned()
    }

    fn has_object_type(&self, name: &str) -> bool {
        self.object_types.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> StaticSchema {
        StaticSchema::new()
            .with_object_type("Person")
            .with_attribute("Age", AttributeType::Integer)
            .with_multivalued_attribute("Member", AttributeType::Reference)
    }

    #[test]
    fn test_attribute_lookup() {
        let schema = schema();
        assert_eq!(schema.attribute_type("Age").unwrap(), AttributeType::Integer);
        assert!(!schema.is_multivalued("Age").unwrap());
        assert!(schema.is_multivalued("Member").unwrap());
    }

    #[test]
    fn test_unknown_attribute() {
        let err = schema().attribute_type("Height").unwrap_err();
        assert_eq!(err, FilterError::UnknownAttribute("Height".to_string()));
    }

    #[test]
    fn test_malformed_attribute_name() {
        let err = schema().validate_attribute_name("Age)").unwrap_err();
        assert!(matches!(err, FilterError::InvalidName { .. }));
    }

    #[test]
    fn test_object_type_validation() {
        let schema = schema();
        assert!(schema.validate_object_type_name("Person").is_ok());
        assert!(schema.validate_object_type_name("*").is_ok());
        assert_eq!(
            schema.validate_object_type_name("Group").unwrap_err(),
            FilterError::UnknownObjectType("Group".to_string())
        );
    }

    #[test]
    fn test_provider_through_reference() {
        let schema = schema();
        let by_ref: &dyn SchemaProvider = &schema;
        assert!(by_ref.has_object_type("Person"));
        assert_eq!(schema.attribute_count(), 2);
    }
}
