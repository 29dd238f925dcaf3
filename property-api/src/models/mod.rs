//! Domain types

mod filter;
mod property;

pub use filter::{PageRequest, PropertyFilter, FILTER_SCHEMA};
pub use property::{Property, PropertyFields, PropertyId, PROPERTY_SCHEMA};
