//! SQLite-backed repository
//!
//! Compiled predicates are rendered into a parameterized `WHERE` clause with
//! [`sqlx::QueryBuilder`]; values are always bound, never interpolated.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::Pagination;
use super::predicate::{CompiledPredicate, FilterValue, Predicate};
use super::traits::{PropertyRepository, RepositoryResult};
use crate::config::StorageConfig;
use crate::error::Result;
use crate::models::{Property, PropertyFields, PropertyId};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS properties (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        address   TEXT    NOT NULL,
        price     REAL    NOT NULL,
        bedrooms  INTEGER NOT NULL,
        bathrooms INTEGER NOT NULL,
        "type"    TEXT
    )
"#;

const SELECT_COLUMNS: &str = r#"SELECT id, address, price, bedrooms, bathrooms, "type" FROM properties"#;

/// [`PropertyRepository`] over a SQLite connection pool
#[derive(Debug, Clone)]
pub struct SqlitePropertyRepository {
    pool: SqlitePool,
}

impl SqlitePropertyRepository {
    /// Open the pool described by `config` and ensure the schema exists
    ///
    /// In-memory URLs are limited to a single long-lived connection, since
    /// every SQLite memory connection is its own database.
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let in_memory = config.url.contains(":memory:") || config.url.contains("mode=memory");

        let mut pool_options = SqlitePoolOptions::new().max_connections(if in_memory {
            1
        } else {
            config.max_connections
        });
        if in_memory {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;
        tracing::info!(
            url = %config.url,
            max_connections = config.max_connections,
            "SQLite connection pool created"
        );

        let repository = Self::from_pool(pool);
        repository.migrate().await?;
        Ok(repository)
    }

    /// Wrap an existing pool without touching the schema
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `properties` table if it is missing
    pub async fn migrate(&self) -> RepositoryResult<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Migrate, e))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Append ` WHERE ...` for every condition in `predicate`
fn push_where<'a>(builder: &mut QueryBuilder<'a, Sqlite>, predicate: &'a CompiledPredicate) {
    for (index, (field, condition)) in predicate.iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        builder.push(format!("\"{}\"", field.column()));
        match condition {
            Predicate::Equals(value) => {
                builder.push(" = ");
                push_value(builder, value);
            }
            Predicate::Range(min, max) => {
                builder.push(" BETWEEN ");
                push_value(builder, min);
                builder.push(" AND ");
                push_value(builder, max);
            }
            Predicate::AtLeast(min) => {
                builder.push(" >= ");
                push_value(builder, min);
            }
            Predicate::AtMost(max) => {
                builder.push(" <= ");
                push_value(builder, max);
            }
        }
    }
}

fn push_value<'a>(builder: &mut QueryBuilder<'a, Sqlite>, value: &'a FilterValue) {
    match value {
        FilterValue::String(s) => builder.push_bind(s.as_str()),
        FilterValue::Integer(n) => builder.push_bind(*n),
        FilterValue::Float(n) => builder.push_bind(*n),
    };
}

impl PropertyRepository for SqlitePropertyRepository {
    async fn find_and_count(
        &self,
        predicate: &CompiledPredicate,
        pagination: Pagination,
    ) -> RepositoryResult<(Vec<Property>, u64)> {
        let op = RepositoryOperation::FindAndCount;

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM properties");
        push_where(&mut count, predicate);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(op, e))?;

        let mut select = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        push_where(&mut select, predicate);
        select.push(" ORDER BY id LIMIT ");
        select.push_bind(pagination.take.max(0));
        select.push(" OFFSET ");
        select.push_bind(pagination.skip.max(0));

        let rows = select
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(op, e))?;

        Ok((rows, u64::try_from(total).unwrap_or(0)))
    }

    async fn find_one_or_fail(&self, id: PropertyId) -> RepositoryResult<Property> {
        sqlx::query_as::<_, Property>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindById, e))?
            .ok_or_else(|| RepositoryError::not_found("Property", id.to_string()))
    }

    async fn exists(&self, id: PropertyId) -> RepositoryResult<bool> {
        let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM properties WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Exists, e))?;
        Ok(found > 0)
    }

    async fn save(
        &self,
        id: Option<PropertyId>,
        fields: PropertyFields,
    ) -> RepositoryResult<Property> {
        let op = RepositoryOperation::Save;

        let id = match id {
            Some(id) => {
                sqlx::query(
                    r#"INSERT INTO properties (id, address, price, bedrooms, bathrooms, "type")
                       VALUES (?, ?, ?, ?, ?, ?)
                       ON CONFLICT(id) DO UPDATE SET
                           address = excluded.address,
                           price = excluded.price,
                           bedrooms = excluded.bedrooms,
                           bathrooms = excluded.bathrooms,
                           "type" = excluded."type""#,
                )
                .bind(id)
                .bind(&fields.address)
                .bind(fields.price)
                .bind(fields.bedrooms)
                .bind(fields.bathrooms)
                .bind(fields.property_type.as_deref())
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::from_sqlx(op, e))?;
                id
            }
            None => sqlx::query(
                r#"INSERT INTO properties (address, price, bedrooms, bathrooms, "type")
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(&fields.address)
            .bind(fields.price)
            .bind(fields.bedrooms)
            .bind(fields.bathrooms)
            .bind(fields.property_type.as_deref())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(op, e))?
            .last_insert_rowid(),
        };

        Ok(fields.with_id(id))
    }

    async fn delete(&self, id: PropertyId) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Delete, e))?;
        Ok(())
    }
}
