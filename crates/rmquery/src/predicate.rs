//! Single attribute comparisons.
//!
//! A [`Predicate`] is validated and compiled when it is constructed. Once it
//! exists it always renders, and always renders the same text.

use std::fmt;

use crate::ast::{AttributeType, ComparisonOperator, FilterValue};
use crate::error::{FilterError, FilterResult};
use crate::literal::{self, format_date_time, is_date_time_literal};
use crate::render::Render;
use crate::schema::{AttributeDescriptor, SchemaProvider};

/// Largest integer the service stores. `attr <= MAX` holds for any value.
pub const INTEGER_PRESENCE_SENTINEL: i64 = i64::MAX;

/// Largest date the service stores. `attr <= MAX` holds for any value.
pub const DATE_TIME_PRESENCE_SENTINEL: &str = "9999-12-31T23:59:59.997";

/// Atomic `attribute operator value` comparison.
///
/// # Example
///
/// ```rust
/// use rmquery::{AttributeType, ComparisonOperator, Predicate, Render, StaticSchema};
///
/// let schema = StaticSchema::new().with_attribute("Age", AttributeType::Integer);
/// let predicate = Predicate::compare(&schema, "Age", ComparisonOperator::GreaterThan, 10).unwrap();
/// assert_eq!(predicate.render(), "(Age > 10)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    attribute: String,
    operator: ComparisonOperator,
    value: Option<FilterValue>,
    negate: bool,
    attribute_type: AttributeType,
    multivalued: bool,
    text: String,
}

impl Predicate {
    /// Creates a predicate, looking the attribute up in `schema`.
    pub fn new(
        schema: &dyn SchemaProvider,
        attribute: &str,
        operator: ComparisonOperator,
        value: Option<FilterValue>,
        negate: bool,
    ) -> FilterResult<Self> {
        let descriptor = schema.resolve_attribute(attribute)?;
        Self::with_descriptor(&descriptor, operator, value, negate)
    }

    /// Creates a predicate from an attribute definition the caller already has.
    pub fn with_descriptor(
        descriptor: &AttributeDescriptor,
        operator: ComparisonOperator,
        value: Option<FilterValue>,
        negate: bool,
    ) -> FilterResult<Self> {
        literal::validate_name(&descriptor.name)?;
        let body = compile(
            &descriptor.name,
            descriptor.attribute_type,
            operator,
            value.as_ref(),
        )?;

        if negate && !operator.allows_negation() {
            return Err(FilterError::IllegalNegation(operator));
        }

        let text = if negate { negation(&body) } else { body };

        Ok(Self {
            attribute: descriptor.name.clone(),
            operator,
            value,
            negate,
            attribute_type: descriptor.attribute_type,
            multivalued: descriptor.multivalued,
            text,
        })
    }

    /// Shorthand for a non-negated comparison with a value.
    pub fn compare(
        schema: &dyn SchemaProvider,
        attribute: &str,
        operator: ComparisonOperator,
        value: impl Into<FilterValue>,
    ) -> FilterResult<Self> {
        Self::new(schema, attribute, operator, Some(value.into()), false)
    }

    /// Attribute has any value.
    pub fn present(schema: &dyn SchemaProvider, attribute: &str) -> FilterResult<Self> {
        Self::new(schema, attribute, ComparisonOperator::IsPresent, None, false)
    }

    /// Attribute has no value.
    pub fn not_present(schema: &dyn SchemaProvider, attribute: &str) -> FilterResult<Self> {
        Self::new(schema, attribute, ComparisonOperator::IsNotPresent, None, false)
    }

    /// Attribute name.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Comparison operator.
    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    /// Comparison value, if the operator takes one.
    pub fn value(&self) -> Option<&FilterValue> {
        self.value.as_ref()
    }

    /// Whether the comparison is negated.
    pub fn is_negated(&self) -> bool {
        self.negate
    }

    /// Declared attribute type.
    pub fn attribute_type(&self) -> AttributeType {
        self.attribute_type
    }

    /// Whether the attribute is multivalued.
    ///
    /// Carried for callers; the dialect text is the same either way because
    /// `NotEquals` is rendered as `not(attr = v)`, which already means "no
    /// value equals v" on a multivalued attribute.
    pub fn is_multivalued(&self) -> bool {
        self.multivalued
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Render for Predicate {}

// =============================================================================
// Compilation
// =============================================================================

pub(crate) fn negation(body: &str) -> String {
    format!("(not{body})")
}

fn compile(
    attribute: &str,
    attribute_type: AttributeType,
    operator: ComparisonOperator,
    value: Option<&FilterValue>,
) -> FilterResult<String> {
    if !attribute_type.is_queryable() {
        return Err(FilterError::UnqueryableAttribute {
            attribute: attribute.to_string(),
            attribute_type,
        });
    }

    if !attribute_type.allows(operator) {
        return Err(FilterError::IllegalOperator {
            attribute: attribute.to_string(),
            attribute_type,
            operator,
        });
    }

    let value = match (operator.requires_value(), value) {
        (true, Some(value)) => Some(value),
        (true, None) => {
            return Err(FilterError::MissingValue {
                attribute: attribute.to_string(),
                operator,
            })
        }
        (false, Some(_)) => {
            return Err(FilterError::UnexpectedValue {
                attribute: attribute.to_string(),
                operator,
            })
        }
        (false, None) => None,
    };

    let Some(value) = value else {
        let body = presence(attribute, attribute_type)?;
        return Ok(match operator {
            ComparisonOperator::IsNotPresent => negation(&body),
            _ => body,
        });
    };

    let rhs = operand(attribute, attribute_type, value)?;
    let text = match operator {
        ComparisonOperator::Equals => format!("({attribute} = {rhs})"),
        ComparisonOperator::NotEquals => negation(&format!("({attribute} = {rhs})")),
        ComparisonOperator::GreaterThan => format!("({attribute} > {rhs})"),
        ComparisonOperator::GreaterThanOrEquals => format!("({attribute} >= {rhs})"),
        ComparisonOperator::LessThan => format!("({attribute} < {rhs})"),
        ComparisonOperator::LessThanOrEquals => format!("({attribute} <= {rhs})"),
        ComparisonOperator::Contains => format!("(contains({attribute}, {rhs}))"),
        ComparisonOperator::StartsWith => format!("(starts-with({attribute}, {rhs}))"),
        ComparisonOperator::EndsWith => format!("(ends-with({attribute}, {rhs}))"),
        ComparisonOperator::IsPresent | ComparisonOperator::IsNotPresent => {
            return Err(FilterError::UnexpectedValue {
                attribute: attribute.to_string(),
                operator,
            })
        }
    };
    Ok(text)
}

/// Proxy expression that holds whenever the attribute has any value.
fn presence(attribute: &str, attribute_type: AttributeType) -> FilterResult<String> {
    let text = match attribute_type {
        AttributeType::Reference => format!("({attribute} = /*)"),
        AttributeType::Integer => format!("({attribute} <= {INTEGER_PRESENCE_SENTINEL})"),
        AttributeType::DateTime => {
            format!("({attribute} <= '{DATE_TIME_PRESENCE_SENTINEL}')")
        }
        AttributeType::Boolean => format!("(({attribute} = true) or ({attribute} = false))"),
        // '%' is the service's presence idiom, not a wildcard match.
        AttributeType::String | AttributeType::Text => format!("(starts-with({attribute}, '%'))"),
        AttributeType::Binary | AttributeType::Unknown => {
            return Err(FilterError::UnqueryableAttribute {
                attribute: attribute.to_string(),
                attribute_type,
            })
        }
    };
    Ok(text)
}

/// Renders the right-hand side of a comparison.
fn operand(
    attribute: &str,
    attribute_type: AttributeType,
    value: &FilterValue,
) -> FilterResult<String> {
    match (attribute_type, value) {
        (AttributeType::Integer, FilterValue::Integer(i)) => Ok(i.to_string()),
        (AttributeType::Boolean, FilterValue::Boolean(b)) => Ok(b.to_string()),
        (AttributeType::DateTime, FilterValue::DateTime(dt)) => {
            Ok(format!("'{}'", format_date_time(dt)))
        }
        (AttributeType::DateTime, FilterValue::String(s)) => {
            if is_date_time_literal(s) {
                Ok(format!("'{s}'"))
            } else {
                // Function expression such as fn:current-dateTime().
                Ok(s.clone())
            }
        }
        (AttributeType::Reference, FilterValue::Reference(id)) => Ok(format!("'{id}'")),
        (AttributeType::Reference, FilterValue::Query(query)) => Ok(query.render()),
        (AttributeType::Reference, FilterValue::String(s))
        | (AttributeType::String, FilterValue::String(s))
        | (AttributeType::Text, FilterValue::String(s)) => literal::quote(s),
        (attribute_type, value) => Err(FilterError::ValueTypeMismatch {
            attribute: attribute.to_string(),
            attribute_type,
            value_kind: value.kind(),
        }),
    }
}
