//! Logical combinations of predicates.

use std::fmt;

use crate::ast::GroupOperator;
use crate::error::{FilterError, FilterResult};
use crate::predicate::{negation, Predicate};
use crate::render::Render;

/// A node in a filter tree: a single predicate or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// Atomic comparison.
    Predicate(Predicate),
    /// Nested group.
    Group(PredicateGroup),
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterNode::Predicate(p) => fmt::Display::fmt(p, f),
            FilterNode::Group(g) => fmt::Display::fmt(g, f),
        }
    }
}

impl Render for FilterNode {}

impl From<Predicate> for FilterNode {
    fn from(predicate: Predicate) -> Self {
        FilterNode::Predicate(predicate)
    }
}

impl From<PredicateGroup> for FilterNode {
    fn from(group: PredicateGroup) -> Self {
        FilterNode::Group(group)
    }
}

/// Ordered children joined by `and` or `or`.
///
/// A group with one child renders as that child. A group with several
/// children is parenthesized. Negation wraps the joined text in `not`.
///
/// ```rust
/// use rmquery::{
///     AttributeType, ComparisonOperator, GroupOperator, Predicate, PredicateGroup, Render,
///     StaticSchema,
/// };
///
/// let schema = StaticSchema::new()
///     .with_attribute("Age", AttributeType::Integer)
///     .with_attribute("Name", AttributeType::String);
///
/// let group = PredicateGroup::new(
///     GroupOperator::Or,
///     vec![
///         Predicate::compare(&schema, "Age", ComparisonOperator::LessThan, 18).unwrap().into(),
///         Predicate::compare(&schema, "Name", ComparisonOperator::StartsWith, "J").unwrap().into(),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(group.render(), "((Age < 18) or (starts-with(Name, 'J')))");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateGroup {
    children: Vec<FilterNode>,
    operator: GroupOperator,
    negate: bool,
}

impl PredicateGroup {
    /// Creates a group. Fails if `children` is empty.
    pub fn new(operator: GroupOperator, children: Vec<FilterNode>) -> FilterResult<Self> {
        if children.is_empty() {
            return Err(FilterError::EmptyGroup);
        }
        Ok(Self {
            children,
            operator,
            negate: false,
        })
    }

    /// Creates a negated group. Fails if `children` is empty.
    pub fn negated(operator: GroupOperator, children: Vec<FilterNode>) -> FilterResult<Self> {
        let mut group = Self::new(operator, children)?;
        group.negate = true;
        Ok(group)
    }

    /// `and` group.
    pub fn all(children: Vec<FilterNode>) -> FilterResult<Self> {
        Self::new(GroupOperator::And, children)
    }

    /// `or` group.
    pub fn any(children: Vec<FilterNode>) -> FilterResult<Self> {
        Self::new(GroupOperator::Or, children)
    }

    /// Children in order.
    pub fn children(&self) -> &[FilterNode] {
        &self.children
    }

    /// Joining operator.
    pub fn operator(&self) -> GroupOperator {
        self.operator
    }

    /// Whether the group is negated.
    pub fn is_negated(&self) -> bool {
        self.negate
    }

    fn joined(&self) -> String {
        let separator = format!(" {} ", self.operator);
        let joined = self
            .children
            .iter()
            .map(|c| c.render())
            .collect::<Vec<_>>()
            .join(&separator);

        if self.children.len() > 1 {
            format!("({joined})")
        } else {
            joined
        }
    }
}

impl fmt::Display for PredicateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.joined();
        if self.negate {
            f.write_str(&negation(&joined))
        } else {
            f.write_str(&joined)
        }
    }
}

impl Render for PredicateGroup {}
