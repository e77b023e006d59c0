//! In-memory `RecordStore`.
//!
//! Mirrors the service's record semantics closely enough for the repositories:
//! unknown tables are `NotFound`, `null` fields are dropped on write, updates
//! merge into the existing fields, and list queries honour sort and limit.

use super::{Fields, ListQuery, Record, RecordStore, SortDirection};
use crate::errors::{Error, Result};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering as AtomicOrdering},
    },
};

/// Tables held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Record>>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Creates a store with the named tables, all empty.
    #[must_use]
    pub fn with_tables(names: &[&str]) -> Self {
        let tables = names
            .iter()
            .map(|name| ((*name).to_string(), Vec::new()))
            .collect();
        Self {
            tables: Mutex::new(tables),
            next_id: AtomicU64::new(1),
        }
    }

    /// Inserts a record exactly as given, bypassing id generation.
    /// Useful for loading fixtures that carry read-only fields.
    pub fn insert_raw(&self, table: &str, record: Record) -> Result<()> {
        let mut tables = self.lock();
        let rows = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        rows.push(record);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Record>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn generate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, AtomicOrdering::Relaxed);
        format!("rec{n:014}")
    }
}

fn table_not_found(table: &str) -> Error {
    Error::NotFound {
        resource: table.to_string(),
    }
}

fn record_not_found(table: &str, id: &str) -> Error {
    Error::NotFound {
        resource: format!("{table}/{id}"),
    }
}

fn without_nulls(fields: Fields) -> Fields {
    fields.into_iter().filter(|(_, value)| !value.is_null()).collect()
}

/// Orders two field values; absent values sort before present ones.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

impl RecordStore for MemoryStore {
    async fn list(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>> {
        let mut records = self
            .lock()
            .get(table)
            .cloned()
            .ok_or_else(|| table_not_found(table))?;

        if !query.sort.is_empty() {
            records.sort_by(|a, b| {
                query.sort.iter().fold(Ordering::Equal, |acc, key| {
                    acc.then_with(|| {
                        let ordering = compare_values(a.field(&key.field), b.field(&key.field));
                        match key.direction {
                            SortDirection::Ascending => ordering,
                            SortDirection::Descending => ordering.reverse(),
                        }
                    })
                })
            });
        }
        if let Some(max) = query.max_records {
            records.truncate(max);
        }
        Ok(records)
    }

    async fn get(&self, table: &str, id: &str) -> Result<Record> {
        let tables = self.lock();
        let rows = tables.get(table).ok_or_else(|| table_not_found(table))?;
        rows.iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| record_not_found(table, id))
    }

    async fn create(&self, table: &str, fields: Fields) -> Result<Record> {
        let record = Record {
            id: self.generate_id(),
            created_time: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            fields: without_nulls(fields),
        };
        let mut tables = self.lock();
        let rows = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, table: &str, id: &str, fields: Fields) -> Result<Record> {
        let mut tables = self.lock();
        let rows = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        let record = rows
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| record_not_found(table, id))?;

        for (name, value) in fields {
            if value.is_null() {
                record.fields.remove(&name);
            } else {
                record.fields.insert(name, value);
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let mut tables = self.lock();
        let rows = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        let before = rows.len();
        rows.retain(|record| record.id != id);
        if rows.len() == before {
            return Err(record_not_found(table, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    #[tokio::test]
    async fn test_create_get_delete() -> Result<()> {
        let store = MemoryStore::with_tables(&["Students"]);
        let created = store
            .create("Students", fields(json!({ "Name": "Ayesha", "Email": null })))
            .await?;

        assert!(created.id.starts_with("rec"));
        assert!(!created.fields.contains_key("Email"));

        let fetched = store.get("Students", &created.id).await?;
        assert_eq!(fetched, created);

        store.delete("Students", &created.id).await?;
        let missing = store.get("Students", &created.id).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_merges_and_clears() -> Result<()> {
        let store = MemoryStore::with_tables(&["Students"]);
        let created = store
            .create("Students", fields(json!({ "Name": "Ayesha", "Grade": "10" })))
            .await?;

        let updated = store
            .update(
                "Students",
                &created.id,
                fields(json!({ "Grade": null, "Phone": "082 555 0101" })),
            )
            .await?;

        assert_eq!(updated.field("Name"), Some(&json!("Ayesha")));
        assert_eq!(updated.field("Grade"), None);
        assert_eq!(updated.field("Phone"), Some(&json!("082 555 0101")));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_table_is_not_found() {
        let store = MemoryStore::with_tables(&["Students"]);
        let result = store.list("Lesons", &ListQuery::default()).await;
        assert!(matches!(result, Err(Error::NotFound { resource }) if resource == "Lesons"));
    }

    #[tokio::test]
    async fn test_list_sorts_and_limits() -> Result<()> {
        let store = MemoryStore::with_tables(&["Lessons"]);
        for date in ["2025-02-01", "2025-03-01", "2025-01-01"] {
            store.create("Lessons", fields(json!({ "Date": date }))).await?;
        }

        let records = store
            .list("Lessons", &ListQuery::default().sort_desc("Date").limit(2))
            .await?;

        let dates: Vec<_> = records.iter().filter_map(|r| r.field("Date")).collect();
        assert_eq!(dates, vec![&json!("2025-03-01"), &json!("2025-02-01")]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_record_is_not_found() {
        let store = MemoryStore::with_tables(&["Lessons"]);
        let result = store.delete("Lessons", "recMissing").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }
}
