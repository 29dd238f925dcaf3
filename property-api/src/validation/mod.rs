//! Structural and semantic validation of untyped request input
//!
//! Each resource declares a [`Schema`]: an ordered table of fields and the
//! [`Rule`]s that apply to them. [`validate`] walks the table against a JSON
//! object and either returns the coerced values or the full, ordered list of
//! human-readable violations.
//!
//! # Example
//!
//! ```rust
//! use property_api::validation::{validate, FieldRules, Mode, Rule, Schema};
//! use serde_json::json;
//!
//! const SCHEMA: Schema = &[
//!     FieldRules::new("price", &[Rule::Required, Rule::IsPositive]),
//! ];
//!
//! let input = json!({ "price": "abc" });
//! let errors = validate(SCHEMA, input.as_object().unwrap(), Mode::Full).unwrap_err();
//! assert_eq!(errors, vec!["price must be a positive number".to_string()]);
//! ```

mod rules;
mod validator;

pub use rules::{FieldRules, Rule, Schema};
pub use validator::{coerce_number, validate, Coerced, Mode, Validated};
