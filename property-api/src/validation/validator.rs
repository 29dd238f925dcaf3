//! Generic rule-table validator
//!
//! Evaluates a [`Schema`] against an untyped JSON object. All fields are
//! checked (no fail-fast) and violations are reported in schema order, then
//! rule order within each field.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::rules::{FieldRules, Rule, Schema};

/// How absent fields are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Absent `Required` fields fail every other rule they declare
    #[default]
    Full,
    /// Absent fields are never checked (used for query filters)
    SkipMissing,
}

/// A field value after coercion
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Text(String),
    Number(f64),
}

/// Field values that passed every declared rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated {
    values: HashMap<&'static str, Coerced>,
}

impl Validated {
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.values.get(field)? {
            Coerced::Text(s) => Some(s.as_str()),
            Coerced::Number(_) => None,
        }
    }

    #[must_use]
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.values.get(field)? {
            Coerced::Number(n) => Some(*n),
            Coerced::Text(_) => None,
        }
    }

    /// Whole-number value; `None` for fractional or non-numeric fields
    #[must_use]
    pub fn integer(&self, field: &str) -> Option<i64> {
        self.number(field)
            .filter(|n| n.fract() == 0.0)
            .map(|n| n as i64)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }
}

/// Parse a raw value as a finite number
///
/// JSON numbers are taken as-is; text is trimmed and parsed. Anything else,
/// or text that parses to NaN/infinity, yields `None`.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Validate `input` against `schema`
///
/// Returns the coerced values on success, or every violation message.
pub fn validate(schema: Schema, input: &Map<String, Value>, mode: Mode) -> Result<Validated, Vec<String>> {
    let mut violations = Vec::new();
    let mut validated = Validated::default();

    for field in schema {
        match input.get(field.field).filter(|v| !v.is_null()) {
            None => violations.extend(missing_violations(field, mode)),
            Some(raw) => match check_present(field, raw) {
                Ok(value) => {
                    validated.values.insert(field.field, value);
                }
                Err(errors) => violations.extend(errors),
            },
        }
    }

    if violations.is_empty() {
        Ok(validated)
    } else {
        Err(violations)
    }
}

fn missing_violations(field: &FieldRules, mode: Mode) -> Vec<String> {
    let skip = mode == Mode::SkipMissing || field.has(Rule::IsOptional) || !field.has(Rule::Required);
    if skip {
        return Vec::new();
    }
    field
        .rules
        .iter()
        .filter_map(|rule| rule.message(field.field))
        .collect()
}

fn check_present(field: &FieldRules, raw: &Value) -> Result<Coerced, Vec<String>> {
    let number = if field.is_numeric() {
        match coerce_number(raw) {
            Some(n) => Some(n),
            None => return Err(vec![field.unparsable_message()]),
        }
    } else {
        None
    };

    let errors: Vec<String> = field
        .rules
        .iter()
        .filter(|rule| !passes(**rule, raw, number))
        .filter_map(|rule| rule.message(field.field))
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    match (number, raw) {
        (Some(n), _) => Ok(Coerced::Number(n)),
        (None, Value::String(s)) => Ok(Coerced::Text(s.clone())),
        (None, other) => Ok(Coerced::Text(other.to_string())),
    }
}

fn passes(rule: Rule, raw: &Value, number: Option<f64>) -> bool {
    match rule {
        Rule::Required | Rule::IsOptional => true,
        Rule::IsString => raw.is_string(),
        Rule::IsInteger => number.is_some_and(|n| n.fract() == 0.0),
        Rule::IsPositive => number.is_some_and(|n| n > 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: Schema = &[
        FieldRules::new("address", &[Rule::Required, Rule::IsString]),
        FieldRules::new("price", &[Rule::Required, Rule::IsPositive]),
        FieldRules::new("bedrooms", &[Rule::Required, Rule::IsInteger, Rule::IsPositive]),
        FieldRules::new("type", &[Rule::IsOptional, Rule::IsString]),
    ];

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_input_is_coerced() {
        let input = object(json!({
            "address": "12 Main St",
            "price": "250000.5",
            "bedrooms": 3,
        }));

        let validated = validate(SCHEMA, &input, Mode::Full).unwrap();
        assert_eq!(validated.text("address"), Some("12 Main St"));
        assert_eq!(validated.number("price"), Some(250000.5));
        assert_eq!(validated.integer("bedrooms"), Some(3));
        assert!(!validated.contains("type"));
    }

    #[test]
    fn test_unparsable_text_reports_single_violation() {
        let input = object(json!({
            "address": "12 Main St",
            "price": "price",
            "bedrooms": "three",
        }));

        let errors = validate(SCHEMA, &input, Mode::Full).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "price must be a positive number".to_string(),
                "bedrooms must be a positive number".to_string(),
            ]
        );
    }

    #[test]
    fn test_violations_follow_rule_order() {
        let input = object(json!({
            "address": 42,
            "price": -1,
            "bedrooms": -1.5,
            "type": 7,
        }));

        let errors = validate(SCHEMA, &input, Mode::Full).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "address must be a string",
                "price must be a positive number",
                "bedrooms must be an integer number",
                "bedrooms must be a positive number",
                "type must be a string",
            ]
        );
    }

    #[test]
    fn test_missing_required_fields_fail_their_rules() {
        let errors = validate(SCHEMA, &Map::new(), Mode::Full).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "address must be a string",
                "price must be a positive number",
                "bedrooms must be an integer number",
                "bedrooms must be a positive number",
            ]
        );
    }

    #[test]
    fn test_null_optional_field_is_accepted() {
        let input = object(json!({
            "address": "1 Elm",
            "price": 10,
            "bedrooms": 1,
            "type": null,
        }));

        assert!(validate(SCHEMA, &input, Mode::Full).is_ok());
    }

    #[test]
    fn test_skip_missing_ignores_absent_fields() {
        let input = object(json!({ "price": "5" }));

        let validated = validate(SCHEMA, &input, Mode::SkipMissing).unwrap();
        assert_eq!(validated.number("price"), Some(5.0));
        assert!(!validated.contains("address"));
    }

    #[test]
    fn test_coerce_number_rejects_non_finite() {
        assert_eq!(coerce_number(&json!("12")), Some(12.0));
        assert_eq!(coerce_number(&json!(" 3.5 ")), Some(3.5));
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!("inf")), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!([1])), None);
    }
}
