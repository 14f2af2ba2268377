//! Root filters and reference dereferencing.

use std::fmt;

use crate::ast::AttributeType;
use crate::error::{FilterError, FilterResult};
use crate::group::FilterNode;
use crate::render::Render;
use crate::schema::SchemaProvider;

/// `/ObjectType[filter]`: every resource of a type matching an optional
/// filter tree.
///
/// ```rust
/// use rmquery::{AttributeType, ComparisonOperator, FilterExpression, Predicate, Render, StaticSchema};
///
/// let schema = StaticSchema::new()
///     .with_object_type("Person")
///     .with_attribute("Age", AttributeType::Integer);
///
/// let age = Predicate::compare(&schema, "Age", ComparisonOperator::GreaterThan, 10).unwrap();
/// let filter = FilterExpression::new(&schema, "Person", Some(age.into())).unwrap();
/// assert_eq!(filter.render(), "/Person[(Age > 10)]");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    object_type: String,
    root: Option<FilterNode>,
}

impl FilterExpression {
    /// Creates a filter over `object_type`, validated against `schema`.
    ///
    /// The `*` wildcard matches every object type and skips validation.
    pub fn new(
        schema: &dyn SchemaProvider,
        object_type: &str,
        root: Option<FilterNode>,
    ) -> FilterResult<Self> {
        schema.validate_object_type_name(object_type)?;
        Ok(Self {
            object_type: object_type.to_string(),
            root,
        })
    }

    /// Every resource of `object_type`, unfiltered.
    pub fn all(schema: &dyn SchemaProvider, object_type: &str) -> FilterResult<Self> {
        Self::new(schema, object_type, None)
    }

    /// Object type name.
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Root of the filter tree.
    pub fn root(&self) -> Option<&FilterNode> {
        self.root.as_ref()
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.object_type)?;
        if let Some(root) = &self.root {
            write!(f, "[{root}]")?;
        }
        Ok(())
    }
}

impl Render for FilterExpression {}

/// A filter followed by a forward reference traversal:
/// `/Person[filter]/Manager` selects the managers of matching people.
#[derive(Debug, Clone, PartialEq)]
pub struct DereferencedExpression {
    filter: FilterExpression,
    dereference_attribute: Option<String>,
}

impl DereferencedExpression {
    /// Creates a dereferenced filter.
    ///
    /// `dereference_attribute`, when given, must be a Reference attribute.
    pub fn new(
        schema: &dyn SchemaProvider,
        object_type: &str,
        root: Option<FilterNode>,
        dereference_attribute: Option<&str>,
    ) -> FilterResult<Self> {
        let filter = FilterExpression::new(schema, object_type, root)?;
        Self::from_filter(schema, filter, dereference_attribute)
    }

    /// Adds a dereference step to an existing filter.
    pub fn from_filter(
        schema: &dyn SchemaProvider,
        filter: FilterExpression,
        dereference_attribute: Option<&str>,
    ) -> FilterResult<Self> {
        if let Some(attribute) = dereference_attribute {
            require_reference(schema, attribute)?;
        }
        Ok(Self {
            filter,
            dereference_attribute: dereference_attribute.map(str::to_string),
        })
    }

    /// The underlying root filter.
    pub fn filter(&self) -> &FilterExpression {
        &self.filter
    }

    /// Attribute followed from each match.
    pub fn dereference_attribute(&self) -> Option<&str> {
        self.dereference_attribute.as_deref()
    }
}

impl fmt::Display for DereferencedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.filter, f)?;
        if let Some(attribute) = &self.dereference_attribute {
            write!(f, "/{attribute}")?;
        }
        Ok(())
    }
}

impl Render for DereferencedExpression {}

/// Checks that `attribute` exists and is reference-typed.
pub(crate) fn require_reference(
    schema: &dyn SchemaProvider,
    attribute: &str,
) -> FilterResult<()> {
    let attribute_type = schema.attribute_type(attribute)?;
    if attribute_type != AttributeType::Reference {
        return Err(FilterError::NotAReference {
            attribute: attribute.to_string(),
            attribute_type,
        });
    }
    Ok(())
}
