//! Rule kinds and per-field rule tables

use std::fmt;

/// A single check applied to one input field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// The field must be present (and not `null`) in full mode
    Required,
    /// Value must be text
    IsString,
    /// Value must be a whole number
    IsInteger,
    /// Value must be a number strictly greater than zero
    IsPositive,
    /// Absence is never a violation, regardless of mode
    IsOptional,
}

impl Rule {
    /// Whether this rule needs a numeric value to be evaluated
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::IsInteger | Self::IsPositive)
    }

    /// Violation message for `field`, or `None` for presence-only rules
    #[must_use]
    pub fn message(&self, field: &str) -> Option<String> {
        match self {
            Self::IsString => Some(format!("{} must be a string", field)),
            Self::IsInteger => Some(format!("{} must be an integer number", field)),
            Self::IsPositive => Some(format!("{} must be a positive number", field)),
            Self::Required | Self::IsOptional => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::IsString => write!(f, "isString"),
            Self::IsInteger => write!(f, "isInteger"),
            Self::IsPositive => write!(f, "isPositive"),
            Self::IsOptional => write!(f, "isOptional"),
        }
    }
}

/// The declared rules of one field, evaluated in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

impl FieldRules {
    #[must_use]
    pub const fn new(field: &'static str, rules: &'static [Rule]) -> Self {
        Self { field, rules }
    }

    #[must_use]
    pub fn has(&self, rule: Rule) -> bool {
        self.rules.contains(&rule)
    }

    /// True when any rule requires numeric coercion of the raw value
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.rules.iter().any(Rule::is_numeric)
    }

    /// Message reported when numeric text cannot be parsed
    ///
    /// Positive-number fields report the positivity message; integer-only
    /// fields report the integer message.
    #[must_use]
    pub fn unparsable_message(&self) -> String {
        let rule = if self.has(Rule::IsPositive) {
            Rule::IsPositive
        } else {
            Rule::IsInteger
        };
        rule.message(self.field).unwrap_or_default()
    }
}

/// Ordered list of field rules; violation order follows this order
pub type Schema = &'static [FieldRules];
