//! The persisted Property entity and its creatable fields

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{validate, FieldRules, Mode, Rule, Schema};

/// Identifier assigned by the repository
pub type PropertyId = i64;

/// Rules every persisted property satisfies
pub const PROPERTY_SCHEMA: Schema = &[
    FieldRules::new("address", &[Rule::Required, Rule::IsString]),
    FieldRules::new("price", &[Rule::Required, Rule::IsPositive]),
    FieldRules::new("bedrooms", &[Rule::Required, Rule::IsInteger, Rule::IsPositive]),
    FieldRules::new("bathrooms", &[Rule::Required, Rule::IsInteger, Rule::IsPositive]),
    FieldRules::new("type", &[Rule::IsOptional, Rule::IsString]),
];

/// A property record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    pub id: PropertyId,
    pub address: String,
    pub price: f64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    #[serde(rename = "type", default)]
    #[sqlx(rename = "type")]
    pub property_type: Option<String>,
}

impl Property {
    /// Split into the id and the fields a client may set
    #[must_use]
    pub fn into_parts(self) -> (PropertyId, PropertyFields) {
        (
            self.id,
            PropertyFields {
                address: self.address,
                price: self.price,
                bedrooms: self.bedrooms,
                bathrooms: self.bathrooms,
                property_type: self.property_type,
            },
        )
    }
}

/// Validated, client-settable property fields
///
/// Request bodies reach storage only through [`PropertyFields::from_input`],
/// which checks them against [`PROPERTY_SCHEMA`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyFields {
    pub address: String,
    pub price: f64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
}

impl PropertyFields {
    /// Validate a raw JSON object in full mode
    ///
    /// Returns every violation, in schema order, when the object is invalid.
    /// Keys outside the schema (including `id`) are ignored.
    pub fn from_input(input: &Map<String, Value>) -> Result<Self, Vec<String>> {
        let validated = validate(PROPERTY_SCHEMA, input, Mode::Full)?;

        let (Some(address), Some(price), Some(bedrooms), Some(bathrooms)) = (
            validated.text("address"),
            validated.number("price"),
            validated.integer("bedrooms"),
            validated.integer("bathrooms"),
        ) else {
            return Err(vec!["property fields are incomplete".to_string()]);
        };

        Ok(Self {
            address: address.to_string(),
            price,
            bedrooms,
            bathrooms,
            property_type: validated.text("type").map(str::to_string),
        })
    }

    /// Attach a repository-assigned id
    #[must_use]
    pub fn with_id(self, id: PropertyId) -> Property {
        Property {
            id,
            address: self.address,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            property_type: self.property_type,
        }
    }
}
