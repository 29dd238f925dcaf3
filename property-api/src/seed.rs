//! Startup seeding from a JSON file
//!
//! The file holds a JSON array of property records, ids included:
//!
//! ```json
//! [
//!   { "id": 1, "address": "74434 East Sweet Bottom Br #18393",
//!     "price": 20714261, "bedrooms": 2, "bathrooms": 5, "type": null }
//! ]
//! ```

use std::path::Path;

use crate::error::{Error, Result};
use crate::models::Property;
use crate::repository::PropertyRepository;

/// Read and parse a seed file
pub async fn load_seed(path: impl AsRef<Path>) -> Result<Vec<Property>> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::Seed(format!("failed to read {}: {}", path.display(), e)))?;

    let properties: Vec<Property> = serde_json::from_str(&contents)?;
    tracing::debug!(path = %path.display(), count = properties.len(), "Parsed seed file");
    Ok(properties)
}

/// Store `properties` under their own ids, replacing existing records
///
/// Returns the number of records written.
pub async fn seed_repository<R: PropertyRepository>(repository: &R, properties: Vec<Property>) -> Result<usize> {
    let count = properties.len();
    for property in properties {
        let (id, fields) = property.into_parts();
        repository.save(Some(id), fields).await?;
    }

    tracing::info!(count, "Seeded property store");
    Ok(count)
}
