//! Access to the hosted tabular-data service.
//!
//! The service stores each table as a list of records: an opaque id plus a map of
//! field name to JSON value. `RecordStore` is the seam the repositories call
//! through; `AirtableStore` talks to the real service over HTTPS and
//! `MemoryStore` keeps tables in process for tests and demos.

/// HTTP client for the Airtable REST API
pub mod airtable;
/// In-process tables with the same record semantics
pub mod memory;

pub use airtable::AirtableStore;
pub use memory::MemoryStore;

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Field name to value mapping of one record
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A record as the service returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque id assigned by the service (e.g. `rec8BdXy7Yq1Xj2Zk`)
    pub id: String,
    /// Creation timestamp, RFC 3339
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    /// Field values; fields that are empty in the service are omitted
    #[serde(default)]
    pub fields: Fields,
}

impl Record {
    /// Looks up a field, treating an explicit `null` the same as an absent field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name).filter(|value| !value.is_null())
    }
}

/// Sort direction for a list query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Value the REST API expects for this direction
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// One sort key of a list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Field to sort by
    pub field: String,
    /// Direction
    pub direction: SortDirection,
}

/// Options for listing a table. The default lists every record in service order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Sort keys, most significant first
    pub sort: Vec<SortField>,
    /// Upper bound on the number of records returned
    pub max_records: Option<usize>,
}

impl ListQuery {
    /// Adds an ascending sort key.
    #[must_use]
    pub fn sort_asc(mut self, field: &str) -> Self {
        self.sort.push(SortField {
            field: field.to_string(),
            direction: SortDirection::Ascending,
        });
        self
    }

    /// Adds a descending sort key.
    #[must_use]
    pub fn sort_desc(mut self, field: &str) -> Self {
        self.sort.push(SortField {
            field: field.to_string(),
            direction: SortDirection::Descending,
        });
        self
    }

    /// Caps the number of records returned.
    #[must_use]
    pub const fn limit(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }
}

/// Per-table record operations offered by the tabular-data service.
///
/// Every call is independent: there is no transaction spanning calls, no retry
/// and no caching. Failures are reported as `Error::NotFound`,
/// `Error::Unauthorized`, `Error::Network` or `Error::Service`.
pub trait RecordStore {
    /// Lists the records of a table.
    fn list(&self, table: &str, query: &ListQuery) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// Fetches one record by id.
    fn get(&self, table: &str, id: &str) -> impl Future<Output = Result<Record>> + Send;

    /// Creates a record and returns it as stored.
    fn create(&self, table: &str, fields: Fields) -> impl Future<Output = Result<Record>> + Send;

    /// Updates the given fields of a record, leaving others untouched.
    /// A `null` value clears the field.
    fn update(&self, table: &str, id: &str, fields: Fields) -> impl Future<Output = Result<Record>> + Send;

    /// Deletes a record.
    fn delete(&self, table: &str, id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Confirms the service is reachable and `table` can be read with the
/// configured credentials, by listing at most one record.
pub async fn check_connection<S: RecordStore>(store: &S, table: &str) -> Result<()> {
    let records = store.list(table, &ListQuery::default().limit(1)).await?;
    tracing::info!(table, sample = records.len(), "Service connection verified");
    Ok(())
}
