//! Error types for filter compilation.

use thiserror::Error;

use crate::ast::{AttributeType, ComparisonOperator};

/// Errors raised while constructing a filter.
///
/// Every variant is produced at construction time. Rendering a value that
/// was successfully constructed never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The attribute is not defined in the schema.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The object type is not defined in the schema.
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    /// The name contains characters that are not allowed in the dialect.
    #[error("invalid name '{name}': {message}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Description of the problem.
        message: String,
    },

    /// The operator cannot be applied to an attribute of this type.
    #[error("operator {operator} is not valid for {attribute_type} attribute '{attribute}'")]
    IllegalOperator {
        /// Attribute name.
        attribute: String,
        /// Declared attribute type.
        attribute_type: AttributeType,
        /// Rejected operator.
        operator: ComparisonOperator,
    },

    /// The attribute type cannot be used in a filter at all.
    #[error("attribute '{attribute}' of type {attribute_type} cannot be queried")]
    UnqueryableAttribute {
        /// Attribute name.
        attribute: String,
        /// Declared attribute type.
        attribute_type: AttributeType,
    },

    /// Negation requested on an operator with fixed polarity.
    #[error("operator {0} cannot be negated")]
    IllegalNegation(ComparisonOperator),

    /// The operator needs a value and none was given.
    #[error("operator {operator} on '{attribute}' requires a value")]
    MissingValue {
        /// Attribute name.
        attribute: String,
        /// Operator that needs a value.
        operator: ComparisonOperator,
    },

    /// A value was given for an operator that takes none.
    #[error("operator {operator} on '{attribute}' does not take a value")]
    UnexpectedValue {
        /// Attribute name.
        attribute: String,
        /// Operator that takes no value.
        operator: ComparisonOperator,
    },

    /// The value kind does not fit the attribute type.
    #[error("{value_kind} value is not valid for {attribute_type} attribute '{attribute}'")]
    ValueTypeMismatch {
        /// Attribute name.
        attribute: String,
        /// Declared attribute type.
        attribute_type: AttributeType,
        /// Kind of the supplied value.
        value_kind: &'static str,
    },

    /// A string literal contains both quote characters.
    #[error("value contains both single and double quotes and cannot be quoted: {0}")]
    UnrepresentableLiteral(String),

    /// A group has no children.
    #[error("predicate group is empty")]
    EmptyGroup,

    /// The attribute must be reference-typed for this use.
    #[error("attribute '{attribute}' is {attribute_type}, expected Reference")]
    NotAReference {
        /// Attribute name.
        attribute: String,
        /// Declared attribute type.
        attribute_type: AttributeType,
    },

    /// `end_group` was called with no open group.
    #[error("no open group to end")]
    UnbalancedGroup,

    /// `build` was called with groups still open.
    #[error("{0} group(s) left open")]
    UnterminatedGroup(usize),
}

/// Result type for filter construction.
pub type FilterResult<T> = std::result::Result<T, FilterError>;
