//! List filters parsed from query parameters
//!
//! A [`PropertyFilter`] is built per request, validated in skip-missing mode
//! and compiled into a [`CompiledPredicate`] for the repository.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::repository::{CompiledPredicate, FilterValue, Predicate, PropertyField};
use crate::validation::{coerce_number, validate, FieldRules, Mode, Rule, Schema};

/// Rules for the filter query keys; absent keys are never checked
pub const FILTER_SCHEMA: Schema = &[
    FieldRules::new("id", &[Rule::IsInteger, Rule::IsPositive]),
    FieldRules::new("address", &[Rule::IsString]),
    FieldRules::new("minPrice", &[Rule::IsPositive]),
    FieldRules::new("maxPrice", &[Rule::IsPositive]),
    FieldRules::new("minBedrooms", &[Rule::IsInteger, Rule::IsPositive]),
    FieldRules::new("maxBedrooms", &[Rule::IsInteger, Rule::IsPositive]),
    FieldRules::new("minBathrooms", &[Rule::IsInteger, Rule::IsPositive]),
    FieldRules::new("maxBathrooms", &[Rule::IsInteger, Rule::IsPositive]),
    FieldRules::new("type", &[Rule::IsString]),
];

/// Optional equality and range constraints on properties
///
/// `None` means the parameter was not supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub id: Option<i64>,
    pub address: Option<String>,
    pub property_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<i64>,
    pub max_bedrooms: Option<i64>,
    pub min_bathrooms: Option<i64>,
    pub max_bathrooms: Option<i64>,
}

impl PropertyFilter {
    /// Build a filter from raw query parameters
    ///
    /// Keys outside [`FILTER_SCHEMA`] (such as `page`) are ignored. Returns
    /// every violation when a supplied value breaks its rules.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, Vec<String>> {
        let input: Map<String, Value> = FILTER_SCHEMA
            .iter()
            .filter_map(|rules| {
                query
                    .get(rules.field)
                    .map(|raw| (rules.field.to_string(), Value::String(raw.clone())))
            })
            .collect();

        let validated = validate(FILTER_SCHEMA, &input, Mode::SkipMissing)?;

        Ok(Self {
            id: validated.integer("id"),
            address: validated.text("address").map(str::to_string),
            property_type: validated.text("type").map(str::to_string),
            min_price: validated.number("minPrice"),
            max_price: validated.number("maxPrice"),
            min_bedrooms: validated.integer("minBedrooms"),
            max_bedrooms: validated.integer("maxBedrooms"),
            min_bathrooms: validated.integer("minBathrooms"),
            max_bathrooms: validated.integer("maxBathrooms"),
        })
    }

    /// Compile into per-field predicates
    ///
    /// Equality fields map to [`Predicate::Equals`]; each range dimension maps
    /// to at most one of `Range`, `AtLeast` or `AtMost` depending on which
    /// bounds are set.
    #[must_use]
    pub fn compile(&self) -> CompiledPredicate {
        let mut predicate = CompiledPredicate::new();

        if let Some(id) = self.id {
            predicate.insert(PropertyField::Id, Predicate::Equals(id.into()));
        }
        if let Some(address) = &self.address {
            predicate.insert(PropertyField::Address, Predicate::Equals(address.as_str().into()));
        }
        if let Some(property_type) = &self.property_type {
            predicate.insert(PropertyField::Type, Predicate::Equals(property_type.as_str().into()));
        }

        let ranges = [
            (
                PropertyField::Price,
                self.min_price.map(FilterValue::from),
                self.max_price.map(FilterValue::from),
            ),
            (
                PropertyField::Bedrooms,
                self.min_bedrooms.map(FilterValue::from),
                self.max_bedrooms.map(FilterValue::from),
            ),
            (
                PropertyField::Bathrooms,
                self.min_bathrooms.map(FilterValue::from),
                self.max_bathrooms.map(FilterValue::from),
            ),
        ];
        for (field, min, max) in ranges {
            if let Some(range) = Predicate::from_bounds(min, max) {
                predicate.insert(field, range);
            }
        }

        predicate
    }
}

/// `page` / `perPage` as supplied by the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageRequest {
    /// Parse pagination parameters; values must be whole numbers
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();
        let page = parse_whole(query, "page", &mut errors);
        let per_page = parse_whole(query, "perPage", &mut errors);

        if errors.is_empty() {
            Ok(Self { page, per_page })
        } else {
            Err(errors)
        }
    }
}

fn parse_whole(query: &HashMap<String, String>, key: &str, errors: &mut Vec<String>) -> Option<i64> {
    let raw = query.get(key)?;
    let whole = coerce_number(&Value::String(raw.clone()))
        .filter(|n| n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64)
        .map(|n| n as i64);
    if whole.is_none() {
        errors.extend(Rule::IsInteger.message(key));
    }
    whole
}
