//! Integration tests for the filter compiler.
//!
//! These run against a hand-written schema provider rather than
//! `StaticSchema` so the provided trait methods are exercised too.

use std::collections::HashMap;

use chrono::NaiveDate;
use rmquery::{
    AscendantExpression, AttributeDescriptor, AttributeType, CachedSchema, ComparisonOperator,
    DereferencedExpression, DescendantExpression, FilterError, FilterExpression, FilterNode,
    FilterValue, GroupOperator, Predicate, PredicateGroup, Query, Render, SchemaProvider,
    XPathBuilder,
};
use uuid::Uuid;

/// Directory-like schema with one attribute per type.
struct DirectorySchema {
    attributes: HashMap<&'static str, AttributeDescriptor>,
}

impl DirectorySchema {
    fn new() -> Self {
        let mut attributes = HashMap::new();
        for (name, attribute_type) in [
            ("Age", AttributeType::Integer),
            ("Enabled", AttributeType::Boolean),
            ("ExpirationTime", AttributeType::DateTime),
            ("Manager", AttributeType::Reference),
            ("ParentGroup", AttributeType::Reference),
            ("DisplayName", AttributeType::String),
            ("Description", AttributeType::Text),
            ("Photo", AttributeType::Binary),
            ("Legacy", AttributeType::Unknown),
        ] {
            attributes.insert(name, AttributeDescriptor::new(name, attribute_type));
        }
        attributes.insert(
            "ProxyAddressCollection",
            AttributeDescriptor::new("ProxyAddressCollection", AttributeType::String).multivalued(),
        );
        Self { attributes }
    }

    fn attribute_for(attribute_type: AttributeType) -> &'static str {
        match attribute_type {
            AttributeType::Integer => "Age",
            AttributeType::Boolean => "Enabled",
            AttributeType::DateTime => "ExpirationTime",
            AttributeType::Reference => "Manager",
            AttributeType::String => "DisplayName",
            AttributeType::Text => "Description",
            AttributeType::Binary => "Photo",
            AttributeType::Unknown => "Legacy",
        }
    }

    fn sample_value(attribute_type: AttributeType) -> FilterValue {
        match attribute_type {
            AttributeType::Integer => FilterValue::Integer(5),
            AttributeType::Boolean => FilterValue::Boolean(true),
            AttributeType::DateTime => FilterValue::String("2024-06-01T08:30:00.000".to_string()),
            AttributeType::Reference => FilterValue::Reference(Uuid::nil()),
            _ => FilterValue::String("x".to_string()),
        }
    }
}

impl SchemaProvider for DirectorySchema {
    fn describe_attribute(&self, name: &str) -> Option<AttributeDescriptor> {
        self.attributes.get(name).cloned()
    }

    fn has_object_type(&self, name: &str) -> bool {
        matches!(name, "Person" | "Group")
    }
}

const ALL_TYPES: [AttributeType; 8] = [
    AttributeType::Integer,
    AttributeType::Boolean,
    AttributeType::DateTime,
    AttributeType::Reference,
    AttributeType::String,
    AttributeType::Text,
    AttributeType::Binary,
    AttributeType::Unknown,
];

fn expected_legal(attribute_type: AttributeType, operator: ComparisonOperator) -> bool {
    use ComparisonOperator::*;

    match attribute_type {
        AttributeType::Integer | AttributeType::DateTime => {
            !matches!(operator, Contains | StartsWith | EndsWith)
        }
        AttributeType::Boolean | AttributeType::Reference => {
            matches!(operator, Equals | NotEquals | IsPresent | IsNotPresent)
        }
        AttributeType::String | AttributeType::Text => !matches!(
            operator,
            GreaterThan | GreaterThanOrEquals | LessThan | LessThanOrEquals
        ),
        AttributeType::Binary | AttributeType::Unknown => false,
    }
}

fn build(
    schema: &DirectorySchema,
    attribute_type: AttributeType,
    operator: ComparisonOperator,
    negate: bool,
) -> Result<Predicate, FilterError> {
    let attribute = DirectorySchema::attribute_for(attribute_type);
    let value = operator
        .requires_value()
        .then(|| DirectorySchema::sample_value(attribute_type));
    Predicate::new(schema, attribute, operator, value, negate)
}

// =============================================================================
// Legality
// =============================================================================

#[test]
fn test_operator_legality_grid() {
    let schema = DirectorySchema::new();

    for attribute_type in ALL_TYPES {
        for operator in ComparisonOperator::ALL {
            let result = build(&schema, attribute_type, operator, false);
            assert_eq!(
                result.is_ok(),
                expected_legal(attribute_type, operator),
                "{attribute_type} {operator}: {result:?}"
            );

            if let Err(err) = result {
                if attribute_type.is_queryable() {
                    assert!(
                        matches!(err, FilterError::IllegalOperator { .. }),
                        "{attribute_type} {operator}: {err}"
                    );
                } else {
                    assert!(
                        matches!(err, FilterError::UnqueryableAttribute { .. }),
                        "{attribute_type} {operator}: {err}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_fixed_polarity_operators_reject_negation() {
    let schema = DirectorySchema::new();

    for attribute_type in ALL_TYPES.into_iter().filter(|t| t.is_queryable()) {
        for operator in [
            ComparisonOperator::NotEquals,
            ComparisonOperator::IsPresent,
            ComparisonOperator::IsNotPresent,
        ] {
            let err = build(&schema, attribute_type, operator, true).unwrap_err();
            assert_eq!(err, FilterError::IllegalNegation(operator));
        }
    }
}

#[test]
fn test_negation_allowed_elsewhere() {
    let schema = DirectorySchema::new();

    for attribute_type in ALL_TYPES {
        for operator in ComparisonOperator::ALL {
            if !operator.allows_negation() || !expected_legal(attribute_type, operator) {
                continue;
            }
            let predicate = build(&schema, attribute_type, operator, true).unwrap();
            assert!(predicate.render().starts_with("(not("));
        }
    }
}

#[test]
fn test_missing_and_unexpected_values() {
    let schema = DirectorySchema::new();

    let err = Predicate::new(&schema, "Age", ComparisonOperator::Equals, None, false).unwrap_err();
    assert!(matches!(err, FilterError::MissingValue { .. }));

    let err = Predicate::new(
        &schema,
        "Age",
        ComparisonOperator::IsPresent,
        Some(FilterValue::Integer(1)),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, FilterError::UnexpectedValue { .. }));
}

#[test]
fn test_value_kind_must_match_type() {
    let schema = DirectorySchema::new();
    let err = Predicate::compare(&schema, "Age", ComparisonOperator::Equals, "ten").unwrap_err();
    assert_eq!(
        err,
        FilterError::ValueTypeMismatch {
            attribute: "Age".to_string(),
            attribute_type: AttributeType::Integer,
            value_kind: "String",
        }
    );
}

#[test]
fn test_unknown_names() {
    let schema = DirectorySchema::new();

    let err = Predicate::present(&schema, "Shoe").unwrap_err();
    assert_eq!(err, FilterError::UnknownAttribute("Shoe".to_string()));

    let err = Predicate::present(&schema, "Age]").unwrap_err();
    assert!(matches!(err, FilterError::InvalidName { .. }));

    let err = FilterExpression::all(&schema, "Computer").unwrap_err();
    assert_eq!(err, FilterError::UnknownObjectType("Computer".to_string()));
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_root_filter_example() {
    let schema = DirectorySchema::new();
    let age = Predicate::compare(&schema, "Age", ComparisonOperator::GreaterThan, 10).unwrap();
    assert_eq!(age.render(), "(Age > 10)");

    let filter = FilterExpression::new(&schema, "Person", Some(age.into())).unwrap();
    assert_eq!(filter.render(), "/Person[(Age > 10)]");
}

#[test]
fn test_contains_quoting() {
    let schema = DirectorySchema::new();
    let render = |value: &str| {
        Predicate::compare(&schema, "DisplayName", ComparisonOperator::Contains, value)
            .map(|p| p.render())
    };

    assert_eq!(render("abc").unwrap(), "(contains(DisplayName, 'abc'))");
    assert_eq!(
        render("o'clock").unwrap(),
        "(contains(DisplayName, \"o'clock\"))"
    );
    assert_eq!(
        render("\"o'clock\"").unwrap_err(),
        FilterError::UnrepresentableLiteral("\"o'clock\"".to_string())
    );
}

#[test]
fn test_presence_proxies() {
    let schema = DirectorySchema::new();
    let present = |attribute: &str| Predicate::present(&schema, attribute).unwrap().render();
    let absent = |attribute: &str| Predicate::not_present(&schema, attribute).unwrap().render();

    assert_eq!(present("Manager"), "(Manager = /*)");
    assert_eq!(absent("Manager"), "(not(Manager = /*))");
    assert_eq!(present("Age"), "(Age <= 9223372036854775807)");
    assert_eq!(
        present("ExpirationTime"),
        "(ExpirationTime <= '9999-12-31T23:59:59.997')"
    );
    assert_eq!(present("Enabled"), "((Enabled = true) or (Enabled = false))");
    assert_eq!(
        absent("Enabled"),
        "(not((Enabled = true) or (Enabled = false)))"
    );
    assert_eq!(present("DisplayName"), "(starts-with(DisplayName, '%'))");
    assert_eq!(absent("Description"), "(not(starts-with(Description, '%')))");
}

#[test]
fn test_date_time_values() {
    let schema = DirectorySchema::new();
    let at = NaiveDate::from_ymd_opt(2025, 3, 9)
        .unwrap()
        .and_hms_milli_opt(7, 5, 0, 250)
        .unwrap();

    let typed = Predicate::compare(&schema, "ExpirationTime", ComparisonOperator::LessThan, at)
        .unwrap();
    assert_eq!(typed.render(), "(ExpirationTime < '2025-03-09T07:05:00.250')");

    let function = Predicate::compare(
        &schema,
        "ExpirationTime",
        ComparisonOperator::LessThanOrEquals,
        "fn:current-dateTime()",
    )
    .unwrap();
    assert_eq!(
        function.render(),
        "(ExpirationTime <= fn:current-dateTime())"
    );
}

#[test]
fn test_reference_values() {
    let schema = DirectorySchema::new();
    let id = Uuid::parse_str("7fb2b853-24f0-4498-9534-4e10589723c4").unwrap();

    let direct = Predicate::compare(&schema, "Manager", ComparisonOperator::Equals, id).unwrap();
    assert_eq!(
        direct.render(),
        "(Manager = '7fb2b853-24f0-4498-9534-4e10589723c4')"
    );

    let boss = Predicate::compare(&schema, "DisplayName", ComparisonOperator::Equals, "Ada").unwrap();
    let bosses = Query::from(FilterExpression::new(&schema, "Person", Some(boss.into())).unwrap());
    let reports =
        Predicate::compare(&schema, "Manager", ComparisonOperator::Equals, bosses).unwrap();
    assert_eq!(
        reports.render(),
        "(Manager = /Person[(DisplayName = 'Ada')])"
    );
}

#[test]
fn test_multivalued_not_equals() {
    let schema = DirectorySchema::new();
    let predicate = Predicate::compare(
        &schema,
        "ProxyAddressCollection",
        ComparisonOperator::NotEquals,
        "smtp:a@b.c",
    )
    .unwrap();

    assert!(predicate.is_multivalued());
    assert_eq!(
        predicate.render(),
        "(not(ProxyAddressCollection = 'smtp:a@b.c'))"
    );
}

#[test]
fn test_group_render_is_idempotent() {
    let schema = DirectorySchema::new();
    let group = PredicateGroup::new(
        GroupOperator::Or,
        vec![
            Predicate::compare(&schema, "Age", ComparisonOperator::LessThan, 18)
                .unwrap()
                .into(),
            Predicate::not_present(&schema, "Manager").unwrap().into(),
        ],
    )
    .unwrap();

    let first = group.render();
    assert_eq!(first, "((Age < 18) or (not(Manager = /*)))");
    assert_eq!(first, group.render());
}

#[test]
fn test_dereference_and_traversals() {
    let schema = DirectorySchema::new();
    let name = |n: &str| -> FilterNode {
        Predicate::compare(&schema, "DisplayName", ComparisonOperator::Equals, n)
            .unwrap()
            .into()
    };

    let managers =
        DereferencedExpression::new(&schema, "Person", Some(name("Bob")), Some("Manager")).unwrap();
    assert_eq!(managers.render(), "/Person[(DisplayName = 'Bob')]/Manager");

    let up = AscendantExpression::new(&schema, "Group", "ParentGroup", name("Leaf")).unwrap();
    assert_eq!(
        up.render(),
        "descendants(/Group[(DisplayName = 'Leaf')], 'ParentGroup')"
    );

    let down = DescendantExpression::new(&schema, "Group", "ParentGroup", name("Root")).unwrap();
    assert_eq!(
        down.render(),
        "/Group[descendant-in('ParentGroup', /Group[(DisplayName = 'Root')])]"
    );
}

// =============================================================================
// Builder and adapters
// =============================================================================

#[test]
fn test_builder_nested_groups() {
    let schema = DirectorySchema::new();
    let query = XPathBuilder::new(&schema, "Person")
        .unwrap()
        .predicate("Enabled", ComparisonOperator::Equals, true)
        .unwrap()
        .start_group(GroupOperator::Or)
        .predicate("DisplayName", ComparisonOperator::StartsWith, "A")
        .unwrap()
        .start_negated_group(GroupOperator::And)
        .present("Manager")
        .unwrap()
        .negated_predicate("Age", ComparisonOperator::GreaterThan, 65)
        .unwrap()
        .end_group()
        .unwrap()
        .end_group()
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        query.render(),
        "/Person[((Enabled = true) and ((starts-with(DisplayName, 'A')) or \
         (not((Manager = /*) and (not(Age > 65))))))]"
    );
    assert_eq!(query.object_type(), "Person");
}

#[test]
fn test_builder_unterminated() {
    let schema = DirectorySchema::new();
    let err = XPathBuilder::new(&schema, "Person")
        .unwrap()
        .start_group(GroupOperator::And)
        .present("Age")
        .unwrap()
        .build()
        .unwrap_err();
    assert_eq!(err, FilterError::UnterminatedGroup(1));
}

#[test]
fn test_cached_schema_compiles_identically() {
    let cached = CachedSchema::new(DirectorySchema::new());

    let direct = Predicate::compare(
        &DirectorySchema::new(),
        "Age",
        ComparisonOperator::GreaterThanOrEquals,
        21,
    )
    .unwrap();
    for _ in 0..3 {
        let via_cache =
            Predicate::compare(&cached, "Age", ComparisonOperator::GreaterThanOrEquals, 21)
                .unwrap();
        assert_eq!(via_cache, direct);
    }

    let stats = cached.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
}

#[test]
fn test_filter_envelope() {
    let schema = DirectorySchema::new();
    let query = XPathBuilder::new(&schema, "Person")
        .unwrap()
        .predicate("Age", ComparisonOperator::LessThan, 30)
        .unwrap()
        .build()
        .unwrap();

    let envelope = query.to_filter_envelope();
    assert!(envelope.starts_with("<Filter xmlns=\"http://schemas.xmlsoap.org/ws/2004/09/enumeration\""));
    assert!(envelope.contains("/Person[(Age &lt; 30)]"));
    assert!(envelope.ends_with("</Filter>"));
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_value_types() {
    let json = serde_json::to_string(&GroupOperator::Or).unwrap();
    assert_eq!(json, "\"or\"");

    let parsed: AttributeType = serde_json::from_str("\"DateTime\"").unwrap();
    assert_eq!(parsed, AttributeType::DateTime);

    let descriptor = AttributeDescriptor::new("Age", AttributeType::Integer);
    let json = serde_json::to_string(&descriptor).unwrap();
    let back: AttributeDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(back, descriptor);
}
