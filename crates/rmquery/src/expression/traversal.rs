//! Hierarchy traversal over a self-referential reference attribute.
//!
//! The service walks the hierarchy itself; these types only produce the
//! call shapes it understands. The function names are the service's and
//! read inverted relative to the expression names. They must not be
//! "corrected".

use std::fmt;

use crate::error::FilterResult;
use crate::group::FilterNode;
use crate::render::Render;
use crate::schema::SchemaProvider;

use super::filter::require_reference;

#[derive(Debug, Clone, PartialEq)]
struct Traversal {
    object_type: String,
    hierarchy_attribute: String,
    target: FilterNode,
}

impl Traversal {
    fn new(
        schema: &dyn SchemaProvider,
        object_type: &str,
        hierarchy_attribute: &str,
        target: FilterNode,
    ) -> FilterResult<Self> {
        schema.validate_object_type_name(object_type)?;
        require_reference(schema, hierarchy_attribute)?;
        Ok(Self {
            object_type: object_type.to_string(),
            hierarchy_attribute: hierarchy_attribute.to_string(),
            target,
        })
    }

    fn target_filter(&self) -> String {
        format!("/{}[{}]", self.object_type, self.target)
    }

    fn quoted_attribute(&self) -> String {
        // Validated identifiers never contain quotes.
        format!("'{}'", self.hierarchy_attribute)
    }
}

/// Every node reachable by walking the hierarchy attribute upward from a
/// matching node.
///
/// Renders `descendants(/Type[target], 'attr')`.
#[derive(Debug, Clone, PartialEq)]
pub struct AscendantExpression {
    traversal: Traversal,
}

impl AscendantExpression {
    /// Creates an ascendant traversal.
    pub fn new(
        schema: &dyn SchemaProvider,
        object_type: &str,
        hierarchy_attribute: &str,
        target: FilterNode,
    ) -> FilterResult<Self> {
        Ok(Self {
            traversal: Traversal::new(schema, object_type, hierarchy_attribute, target)?,
        })
    }

    /// Object type being walked.
    pub fn object_type(&self) -> &str {
        &self.traversal.object_type
    }

    /// Self-referential attribute that links nodes.
    pub fn hierarchy_attribute(&self) -> &str {
        &self.traversal.hierarchy_attribute
    }
}

impl fmt::Display for AscendantExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "descendants({}, {})",
            self.traversal.target_filter(),
            self.traversal.quoted_attribute()
        )
    }
}

impl Render for AscendantExpression {}

/// Every node from which a matching node is reachable by walking the
/// hierarchy attribute downward.
///
/// Renders `/Type[descendant-in('attr', /Type[target])]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DescendantExpression {
    traversal: Traversal,
}

impl DescendantExpression {
    /// Creates a descendant traversal.
    pub fn new(
        schema: &dyn SchemaProvider,
        object_type: &str,
        hierarchy_attribute: &str,
        target: FilterNode,
    ) -> FilterResult<Self> {
        Ok(Self {
            traversal: Traversal::new(schema, object_type, hierarchy_attribute, target)?,
        })
    }

    /// Object type being walked.
    pub fn object_type(&self) -> &str {
        &self.traversal.object_type
    }

    /// Self-referential attribute that links nodes.
    pub fn hierarchy_attribute(&self) -> &str {
        &self.traversal.hierarchy_attribute
    }
}

impl fmt::Display for DescendantExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/{}[descendant-in({}, {})]",
            self.traversal.object_type,
            self.traversal.quoted_attribute(),
            self.traversal.target_filter()
        )
    }
}

impl Render for DescendantExpression {}
