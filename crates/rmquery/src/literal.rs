//! Literal recognition and quoting for the XPath filter dialect.
//!
//! The resource service accepts a narrow XPath subset. Names are plain
//! identifiers, strings are quoted with `'` or `"` (no escaping exists), and
//! date-time literals follow a fixed ISO-like shape.

use chrono::NaiveDateTime;
use nom::{
    bytes::complete::{tag, take_while, take_while_m_n},
    character::complete::{char, satisfy},
    combinator::{all_consuming, opt, recognize},
    sequence::{pair, preceded, tuple},
    IResult,
};

use crate::error::{FilterError, FilterResult};

/// Wildcard object type matching every resource.
pub const WILDCARD_OBJECT_TYPE: &str = "*";

/// Format used when rendering [`NaiveDateTime`] values.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

// ============================================================================
// Date-time literals
// ============================================================================

fn digits2(input: &str) -> IResult<&str, &str> {
    take_while_m_n(2, 2, |c: char| c.is_ascii_digit())(input)
}

fn digits4(input: &str) -> IResult<&str, &str> {
    take_while_m_n(4, 4, |c: char| c.is_ascii_digit())(input)
}

fn fraction(input: &str) -> IResult<&str, &str> {
    preceded(char('.'), take_while_m_n(1, 7, |c: char| c.is_ascii_digit()))(input)
}

fn date_time_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        digits4,
        char('-'),
        digits2,
        char('-'),
        digits2,
        char('T'),
        digits2,
        char(':'),
        digits2,
        opt(pair(preceded(char(':'), digits2), opt(fraction))),
        opt(tag("Z")),
    )))(input)
}

/// Returns true if `text` is a date-time literal the service accepts as a
/// quoted value, such as `2024-01-31T12:00:00.000`.
///
/// Anything else in a DateTime predicate is treated as a function
/// expression and emitted verbatim.
pub fn is_date_time_literal(text: &str) -> bool {
    all_consuming(date_time_literal)(text).is_ok()
}

/// Formats a date-time value as a service literal (without quotes).
pub fn format_date_time(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

// ============================================================================
// Names
// ============================================================================

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

/// Checks that `name` is a plain dialect identifier.
pub fn validate_name(name: &str) -> FilterResult<()> {
    if name.is_empty() {
        return Err(FilterError::InvalidName {
            name: String::new(),
            message: "name is empty".to_string(),
        });
    }

    match all_consuming(identifier)(name) {
        Ok(_) => Ok(()),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = name.len() - e.input.len();
            Err(FilterError::InvalidName {
                name: name.to_string(),
                message: format!("unexpected character at position {position}"),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(FilterError::InvalidName {
            name: name.to_string(),
            message: "incomplete name".to_string(),
        }),
    }
}

/// Checks an object type name, accepting the `*` wildcard.
pub fn validate_object_type(name: &str) -> FilterResult<()> {
    if name == WILDCARD_OBJECT_TYPE {
        return Ok(());
    }
    validate_name(name)
}

// ============================================================================
// Quoting
// ============================================================================

/// Quotes a string literal.
///
/// Single quotes are used unless the value contains one, in which case
/// double quotes are used. A value containing both has no representation.
pub fn quote(value: &str) -> FilterResult<String> {
    match (value.contains('\''), value.contains('"')) {
        (false, _) => Ok(format!("'{value}'")),
        (true, false) => Ok(format!("\"{value}\"")),
        (true, true) => Err(FilterError::UnrepresentableLiteral(value.to_string())),
    }
}

/// Escapes text for inclusion in an XML element body or attribute.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
