//! Compiled query predicates
//!
//! A [`CompiledPredicate`] maps each filtered [`PropertyField`] to exactly one
//! [`Predicate`]. Storage adapters translate it into their native query form;
//! [`CompiledPredicate::matches`] evaluates it directly against a record.
//!
//! # Example
//!
//! ```rust
//! use property_api::repository::{CompiledPredicate, Predicate, PropertyField};
//!
//! let predicate = CompiledPredicate::new()
//!     .with(PropertyField::Type, Predicate::Equals("Townhouse".into()))
//!     .with(PropertyField::Price, Predicate::AtLeast(100_000.0.into()));
//!
//! assert_eq!(predicate.len(), 2);
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::Property;

/// Entity fields a predicate can constrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyField {
    Id,
    Address,
    Price,
    Bedrooms,
    Bathrooms,
    Type,
}

impl PropertyField {
    /// Storage column name
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Address => "address",
            Self::Price => "price",
            Self::Bedrooms => "bedrooms",
            Self::Bathrooms => "bathrooms",
            Self::Type => "type",
        }
    }

    /// Value of this field on `property`; `None` for a null `type`
    #[must_use]
    pub fn value_of(&self, property: &Property) -> Option<FilterValue> {
        match self {
            Self::Id => Some(FilterValue::Integer(property.id)),
            Self::Address => Some(FilterValue::String(property.address.clone())),
            Self::Price => Some(FilterValue::Float(property.price)),
            Self::Bedrooms => Some(FilterValue::Integer(property.bedrooms)),
            Self::Bathrooms => Some(FilterValue::Integer(property.bathrooms)),
            Self::Type => property.property_type.clone().map(FilterValue::String),
        }
    }
}

impl fmt::Display for PropertyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// A value that can be used in predicates
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// String value
    String(String),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
}

impl FilterValue {
    /// Compare two values; numbers compare across integer/float, strings
    /// compare lexically, mixed kinds are incomparable
    fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::String(_), _) | (_, Self::String(_)) => None,
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::String(_) => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "'{}'", s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
        }
    }
}

/// Condition applied to a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// field = value
    Equals(FilterValue),
    /// min <= field <= max
    Range(FilterValue, FilterValue),
    /// field >= min
    AtLeast(FilterValue),
    /// field <= max
    AtMost(FilterValue),
}

impl Predicate {
    /// Pick the predicate for a range dimension from its optional bounds
    ///
    /// Both bounds give [`Predicate::Range`], one bound gives
    /// [`Predicate::AtLeast`] or [`Predicate::AtMost`], none gives `None`.
    /// Bounds are passed through unchecked; `min > max` simply matches nothing.
    #[must_use]
    pub fn from_bounds(min: Option<FilterValue>, max: Option<FilterValue>) -> Option<Self> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Self::Range(min, max)),
            (Some(min), None) => Some(Self::AtLeast(min)),
            (None, Some(max)) => Some(Self::AtMost(max)),
            (None, None) => None,
        }
    }

    /// Whether `value` satisfies this predicate; a null value never does
    #[must_use]
    pub fn matches(&self, value: Option<&FilterValue>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Self::Equals(expected) => value.compare(expected) == Some(Ordering::Equal),
            Self::Range(min, max) => {
                matches!(value.compare(min), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(value.compare(max), Some(Ordering::Less | Ordering::Equal))
            }
            Self::AtLeast(min) => {
                matches!(value.compare(min), Some(Ordering::Greater | Ordering::Equal))
            }
            Self::AtMost(max) => {
                matches!(value.compare(max), Some(Ordering::Less | Ordering::Equal))
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(v) => write!(f, "= {}", v),
            Self::Range(min, max) => write!(f, "BETWEEN {} AND {}", min, max),
            Self::AtLeast(min) => write!(f, ">= {}", min),
            Self::AtMost(max) => write!(f, "<= {}", max),
        }
    }
}

/// Field-to-predicate mapping produced by filter compilation
///
/// At most one predicate per field; iteration order is the field order and
/// carries no meaning for callers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledPredicate {
    conditions: BTreeMap<PropertyField, Predicate>,
}

impl CompiledPredicate {
    /// An empty predicate that matches every record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the predicate for `field`, replacing any previous one
    #[must_use]
    pub fn with(mut self, field: PropertyField, predicate: Predicate) -> Self {
        self.insert(field, predicate);
        self
    }

    pub fn insert(&mut self, field: PropertyField, predicate: Predicate) {
        self.conditions.insert(field, predicate);
    }

    #[must_use]
    pub fn get(&self, field: PropertyField) -> Option<&Predicate> {
        self.conditions.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropertyField, &Predicate)> {
        self.conditions.iter().map(|(field, predicate)| (*field, predicate))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether `property` satisfies every condition
    #[must_use]
    pub fn matches(&self, property: &Property) -> bool {
        self.conditions
            .iter()
            .all(|(field, predicate)| predicate.matches(field.value_of(property).as_ref()))
    }
}

impl fmt::Display for CompiledPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return write!(f, "*");
        }
        let parts: Vec<String> = self
            .iter()
            .map(|(field, predicate)| format!("{} {}", field, predicate))
            .collect();
        write!(f, "{}", parts.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(price: f64, bedrooms: i64, property_type: Option<&str>) -> Property {
        Property {
            id: 1,
            address: "1 Test Way".to_string(),
            price,
            bedrooms,
            bathrooms: 2,
            property_type: property_type.map(str::to_string),
        }
    }

    #[test]
    fn test_from_bounds_selects_variant() {
        assert_eq!(
            Predicate::from_bounds(Some(1_i64.into()), Some(5_i64.into())),
            Some(Predicate::Range(1_i64.into(), 5_i64.into()))
        );
        assert_eq!(
            Predicate::from_bounds(Some(1_i64.into()), None),
            Some(Predicate::AtLeast(1_i64.into()))
        );
        assert_eq!(
            Predicate::from_bounds(None, Some(5_i64.into())),
            Some(Predicate::AtMost(5_i64.into()))
        );
        assert_eq!(Predicate::from_bounds(None, None), None);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = Predicate::Range(FilterValue::Float(10.0), FilterValue::Float(20.0));
        assert!(range.matches(Some(&FilterValue::Float(10.0))));
        assert!(range.matches(Some(&FilterValue::Float(20.0))));
        assert!(!range.matches(Some(&FilterValue::Float(20.5))));
        assert!(range.matches(Some(&FilterValue::Integer(15))));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let range = Predicate::Range(FilterValue::Integer(10), FilterValue::Integer(1));
        assert!(!range.matches(Some(&FilterValue::Integer(5))));
    }

    #[test]
    fn test_null_never_matches() {
        assert!(!Predicate::Equals("Condo".into()).matches(None));
        assert!(!Predicate::AtLeast(FilterValue::Integer(0)).matches(None));
    }

    #[test]
    fn test_mixed_kinds_do_not_match() {
        assert!(!Predicate::Equals("5".into()).matches(Some(&FilterValue::Integer(5))));
    }

    #[test]
    fn test_compiled_predicate_matches_all_conditions() {
        let predicate = CompiledPredicate::new()
            .with(PropertyField::Type, Predicate::Equals("Townhouse".into()))
            .with(PropertyField::Bedrooms, Predicate::AtMost(3_i64.into()));

        assert!(predicate.matches(&property(1.0, 3, Some("Townhouse"))));
        assert!(!predicate.matches(&property(1.0, 4, Some("Townhouse"))));
        assert!(!predicate.matches(&property(1.0, 3, None)));
        assert!(CompiledPredicate::new().matches(&property(1.0, 9, None)));
    }

    #[test]
    fn test_display() {
        let predicate = CompiledPredicate::new()
            .with(PropertyField::Price, Predicate::Range(1.5.into(), 9.0.into()))
            .with(PropertyField::Id, Predicate::Equals(3_i64.into()));

        assert_eq!(predicate.to_string(), "id = 3 AND price BETWEEN 1.5 AND 9");
        assert_eq!(CompiledPredicate::new().to_string(), "*");
    }
}
