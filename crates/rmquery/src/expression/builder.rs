//! Stack-based builder for nested filters.
//!
//! Groups are opened and closed explicitly instead of being expressed by
//! call-site nesting. Each open group is a frame on a stack; closing a
//! frame turns it into a [`PredicateGroup`] and appends it to the frame
//! below. Building checks that only the implicit root frame is left.

use crate::ast::{ComparisonOperator, FilterValue, GroupOperator};
use crate::error::{FilterError, FilterResult};
use crate::group::{FilterNode, PredicateGroup};
use crate::predicate::Predicate;
use crate::schema::SchemaProvider;

use super::filter::{require_reference, DereferencedExpression, FilterExpression};
use super::traversal::{AscendantExpression, DescendantExpression};
use super::Query;

#[derive(Debug, Default)]
struct Frame {
    operator: GroupOperator,
    negate: bool,
    children: Vec<FilterNode>,
}

impl Frame {
    fn new(operator: GroupOperator, negate: bool) -> Self {
        Self {
            operator,
            negate,
            children: Vec::new(),
        }
    }

    fn into_group(self) -> FilterResult<PredicateGroup> {
        if self.negate {
            PredicateGroup::negated(self.operator, self.children)
        } else {
            PredicateGroup::new(self.operator, self.children)
        }
    }
}

/// Fluent builder for filters over one object type.
///
/// ```rust
/// use rmquery::{AttributeType, ComparisonOperator, GroupOperator, Render, StaticSchema, XPathBuilder};
///
/// let schema = StaticSchema::new()
///     .with_object_type("Person")
///     .with_attribute("Age", AttributeType::Integer)
///     .with_attribute("Department", AttributeType::String)
///     .with_attribute("Manager", AttributeType::Reference);
///
/// let query = XPathBuilder::new(&schema, "Person")?
///     .predicate("Age", ComparisonOperator::GreaterThanOrEquals, 18)?
///     .start_group(GroupOperator::Or)
///     .predicate("Department", ComparisonOperator::Equals, "Sales")?
///     .present("Manager")?
///     .end_group()?
///     .build()?;
///
/// assert_eq!(
///     query.render(),
///     "/Person[((Age >= 18) and ((Department = 'Sales') or (Manager = /*)))]"
/// );
/// # Ok::<(), rmquery::FilterError>(())
/// ```
pub struct XPathBuilder<'s> {
    schema: &'s dyn SchemaProvider,
    object_type: String,
    root: Frame,
    stack: Vec<Frame>,
    dereference: Option<String>,
}

impl<'s> XPathBuilder<'s> {
    /// Starts a builder for `object_type`. The root level joins with `and`.
    pub fn new(schema: &'s dyn SchemaProvider, object_type: &str) -> FilterResult<Self> {
        schema.validate_object_type_name(object_type)?;
        Ok(Self {
            schema,
            object_type: object_type.to_string(),
            root: Frame::default(),
            stack: Vec::new(),
            dereference: None,
        })
    }

    /// Changes how top-level children are joined.
    pub fn with_root_operator(mut self, operator: GroupOperator) -> Self {
        self.root.operator = operator;
        self
    }

    /// Adds a comparison to the innermost open group.
    pub fn predicate(
        self,
        attribute: &str,
        operator: ComparisonOperator,
        value: impl Into<FilterValue>,
    ) -> FilterResult<Self> {
        let predicate = Predicate::new(self.schema, attribute, operator, Some(value.into()), false)?;
        Ok(self.node(predicate))
    }

    /// Adds a negated comparison to the innermost open group.
    pub fn negated_predicate(
        self,
        attribute: &str,
        operator: ComparisonOperator,
        value: impl Into<FilterValue>,
    ) -> FilterResult<Self> {
        let predicate = Predicate::new(self.schema, attribute, operator, Some(value.into()), true)?;
        Ok(self.node(predicate))
    }

    /// Adds "attribute has a value".
    pub fn present(self, attribute: &str) -> FilterResult<Self> {
        let predicate = Predicate::present(self.schema, attribute)?;
        Ok(self.node(predicate))
    }

    /// Adds "attribute has no value".
    pub fn not_present(self, attribute: &str) -> FilterResult<Self> {
        let predicate = Predicate::not_present(self.schema, attribute)?;
        Ok(self.node(predicate))
    }

    /// Adds an already-built predicate or group.
    pub fn node(mut self, node: impl Into<FilterNode>) -> Self {
        self.current().children.push(node.into());
        self
    }

    /// Opens a nested group.
    pub fn start_group(mut self, operator: GroupOperator) -> Self {
        self.stack.push(Frame::new(operator, false));
        self
    }

    /// Opens a nested group whose result is negated.
    pub fn start_negated_group(mut self, operator: GroupOperator) -> Self {
        self.stack.push(Frame::new(operator, true));
        self
    }

    /// Closes the innermost open group.
    pub fn end_group(mut self) -> FilterResult<Self> {
        let frame = self.stack.pop().ok_or(FilterError::UnbalancedGroup)?;
        let group = frame.into_group()?;
        self.current().children.push(group.into());
        Ok(self)
    }

    /// Follows `attribute` from each match. Must be a Reference attribute.
    pub fn dereference(mut self, attribute: &str) -> FilterResult<Self> {
        require_reference(self.schema, attribute)?;
        self.dereference = Some(attribute.to_string());
        Ok(self)
    }

    /// Number of groups currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Finishes the query.
    pub fn build(self) -> FilterResult<Query> {
        let schema = self.schema;
        let dereference = self.dereference.clone();
        let (object_type, root) = self.finish()?;

        match dereference {
            Some(attribute) => Ok(DereferencedExpression::new(
                schema,
                &object_type,
                root,
                Some(&attribute),
            )?
            .into()),
            None => Ok(FilterExpression::new(schema, &object_type, root)?.into()),
        }
    }

    /// Finishes the filter as the target of an upward hierarchy walk.
    pub fn build_ascendant(self, hierarchy_attribute: &str) -> FilterResult<Query> {
        let schema = self.schema;
        let (object_type, root) = self.finish()?;
        let target = root.ok_or(FilterError::EmptyGroup)?;
        Ok(AscendantExpression::new(schema, &object_type, hierarchy_attribute, target)?.into())
    }

    /// Finishes the filter as the target of a downward hierarchy walk.
    pub fn build_descendant(self, hierarchy_attribute: &str) -> FilterResult<Query> {
        let schema = self.schema;
        let (object_type, root) = self.finish()?;
        let target = root.ok_or(FilterError::EmptyGroup)?;
        Ok(DescendantExpression::new(schema, &object_type, hierarchy_attribute, target)?.into())
    }

    fn current(&mut self) -> &mut Frame {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    fn finish(self) -> FilterResult<(String, Option<FilterNode>)> {
        if !self.stack.is_empty() {
            return Err(FilterError::UnterminatedGroup(self.stack.len()));
        }

        let mut children = self.root.children;
        let root = match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(PredicateGroup::new(self.root.operator, children)?.into()),
        };
        Ok((self.object_type, root))
    }
}

impl std::fmt::Debug for XPathBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XPathBuilder")
            .field("object_type", &self.object_type)
            .field("root", &self.root)
            .field("stack", &self.stack)
            .field("dereference", &self.dereference)
            .finish()
    }
}
