//! Core value types shared by predicates, groups and expressions.

use std::fmt;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::expression::Query;

// =============================================================================
// Attribute Types
// =============================================================================

/// Declared type of a schema attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeType {
    /// 64-bit signed integer.
    Integer,
    /// `true` / `false`.
    Boolean,
    /// Date and time without zone.
    DateTime,
    /// Reference to another resource by identifier.
    Reference,
    /// Indexed string.
    String,
    /// Unindexed long text.
    Text,
    /// Opaque bytes. Never queryable.
    Binary,
    /// Type the schema could not classify. Never queryable.
    Unknown,
}

impl AttributeType {
    /// Returns true if `operator` may be applied to attributes of this type.
    pub fn allows(self, operator: ComparisonOperator) -> bool {
        use ComparisonOperator::*;

        match self {
            AttributeType::Integer | AttributeType::DateTime => {
                !matches!(operator, Contains | StartsWith | EndsWith)
            }
            AttributeType::Boolean | AttributeType::Reference => {
                matches!(operator, Equals | NotEquals | IsPresent | IsNotPresent)
            }
            AttributeType::String | AttributeType::Text => !operator.is_ordering(),
            AttributeType::Binary | AttributeType::Unknown => false,
        }
    }

    /// Returns true if attributes of this type can appear in a filter at all.
    pub fn is_queryable(self) -> bool {
        !matches!(self, AttributeType::Binary | AttributeType::Unknown)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeType::Integer => "Integer",
            AttributeType::Boolean => "Boolean",
            AttributeType::DateTime => "DateTime",
            AttributeType::Reference => "Reference",
            AttributeType::String => "String",
            AttributeType::Text => "Text",
            AttributeType::Binary => "Binary",
            AttributeType::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Operators
// =============================================================================

/// Comparison applied by a single predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComparisonOperator {
    /// `attr = value`
    Equals,
    /// `not(attr = value)`
    NotEquals,
    /// `attr > value`
    GreaterThan,
    /// `attr >= value`
    GreaterThanOrEquals,
    /// `attr < value`
    LessThan,
    /// `attr <= value`
    LessThanOrEquals,
    /// `contains(attr, value)`
    Contains,
    /// `starts-with(attr, value)`
    StartsWith,
    /// `ends-with(attr, value)`
    EndsWith,
    /// Attribute has any value.
    IsPresent,
    /// Attribute has no value.
    IsNotPresent,
}

impl ComparisonOperator {
    /// All operators, in declaration order.
    pub const ALL: [ComparisonOperator; 11] = [
        ComparisonOperator::Equals,
        ComparisonOperator::NotEquals,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::GreaterThanOrEquals,
        ComparisonOperator::LessThan,
        ComparisonOperator::LessThanOrEquals,
        ComparisonOperator::Contains,
        ComparisonOperator::StartsWith,
        ComparisonOperator::EndsWith,
        ComparisonOperator::IsPresent,
        ComparisonOperator::IsNotPresent,
    ];

    /// `>`, `>=`, `<`, `<=`.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            ComparisonOperator::GreaterThan
                | ComparisonOperator::GreaterThanOrEquals
                | ComparisonOperator::LessThan
                | ComparisonOperator::LessThanOrEquals
        )
    }

    /// `contains`, `starts-with`, `ends-with`.
    pub fn is_substring(self) -> bool {
        matches!(
            self,
            ComparisonOperator::Contains
                | ComparisonOperator::StartsWith
                | ComparisonOperator::EndsWith
        )
    }

    /// Operators that take a value.
    pub fn requires_value(self) -> bool {
        !matches!(
            self,
            ComparisonOperator::IsPresent | ComparisonOperator::IsNotPresent
        )
    }

    /// Operators whose polarity is already fixed and so cannot be negated.
    pub fn allows_negation(self) -> bool {
        !matches!(
            self,
            ComparisonOperator::NotEquals
                | ComparisonOperator::IsPresent
                | ComparisonOperator::IsNotPresent
        )
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Logical operator joining the children of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GroupOperator {
    /// All children must match.
    #[default]
    And,
    /// Any child may match.
    Or,
}

impl fmt::Display for GroupOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupOperator::And => f.write_str("and"),
            GroupOperator::Or => f.write_str("or"),
        }
    }
}

// =============================================================================
// Values
// =============================================================================

/// Right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Integer literal.
    Integer(i64),
    /// Boolean literal.
    Boolean(bool),
    /// Date-time, rendered as a quoted literal with millisecond precision.
    DateTime(NaiveDateTime),
    /// String literal. On DateTime attributes, text that is not a date
    /// literal is emitted verbatim as a function expression.
    String(String),
    /// Resource identifier.
    Reference(Uuid),
    /// Nested query, embedded unquoted as a relational sub-query.
    Query(Box<Query>),
}

impl FilterValue {
    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterValue::Integer(_) => "Integer",
            FilterValue::Boolean(_) => "Boolean",
            FilterValue::DateTime(_) => "DateTime",
            FilterValue::String(_) => "String",
            FilterValue::Reference(_) => "Reference",
            FilterValue::Query(_) => "Query",
        }
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Integer(i64::from(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Boolean(value)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(value: NaiveDateTime) -> Self {
        FilterValue::DateTime(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Reference(value)
    }
}

impl From<Query> for FilterValue {
    fn from(value: Query) -> Self {
        FilterValue::Query(Box::new(value))
    }
}
