//! HTTP client for the hosted tabular-data service (Airtable REST API, v0).
//!
//! Each `RecordStore` call is one request (listing follows pagination offsets),
//! authenticated with a personal access token. Non-success responses are turned
//! into `Error::Unauthorized`, `Error::NotFound` or `Error::Service`; transport
//! failures become `Error::Network`. Nothing is retried.

use super::{Fields, ListQuery, Record, RecordStore};
use crate::{
    config::ServiceCredentials,
    errors::{Error, Result},
};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Largest page the service will return
const PAGE_SIZE: usize = 100;

#[derive(Deserialize)]
struct ListResponse {
    records: Vec<Record>,
    offset: Option<String>,
}

#[derive(Serialize)]
struct WriteRequest {
    fields: Fields,
    typecast: bool,
}

/// Client for one base of the tabular-data service
#[derive(Debug, Clone)]
pub struct AirtableStore {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl AirtableStore {
    /// Creates a client for the base named in `credentials`.
    ///
    /// # Arguments
    /// * `credentials` - Access token and base id, already validated
    /// * `endpoint_url` - Service root, e.g. `https://api.airtable.com`
    pub fn new(credentials: &ServiceCredentials, endpoint_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(endpoint_url).map_err(|e| Error::Config {
            message: format!("Invalid service endpoint '{endpoint_url}': {e}"),
        })?;
        base_url
            .path_segments_mut()
            .map_err(|()| Error::Config {
                message: format!("Service endpoint '{endpoint_url}' cannot hold a path"),
            })?
            .pop_if_empty()
            .push("v0")
            .push(&credentials.base_id);

        Ok(Self {
            client: Client::new(),
            base_url,
            api_key: credentials.api_key.clone(),
        })
    }

    /// URL of a table, or of a record when `id` is given. Segments are
    /// percent-encoded, so table names may contain spaces.
    fn url(&self, table: &str, id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| Error::Config {
                message: "Service endpoint cannot hold a path".to_string(),
            })?;
            segments.push(table);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, resource: &str) -> Result<Value> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Error::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| Error::Network {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(error_for_status(status, &body, resource));
        }

        serde_json::from_str(&body).map_err(|e| Error::Service {
            status: status.as_u16(),
            message: format!("Unreadable response body: {e}"),
        })
    }

    async fn send_record(&self, request: RequestBuilder, resource: &str) -> Result<Record> {
        let value = self.send(request, resource).await?;
        serde_json::from_value(value).map_err(|e| Error::Service {
            status: 0,
            message: format!("Unexpected record shape: {e}"),
        })
    }
}

/// Query parameters for one page of a list request.
fn list_params(query: &ListQuery, offset: Option<&str>) -> Vec<(String, String)> {
    let page_size = query.max_records.map_or(PAGE_SIZE, |max| max.clamp(1, PAGE_SIZE));
    let mut params = vec![("pageSize".to_string(), page_size.to_string())];
    if let Some(max) = query.max_records {
        params.push(("maxRecords".to_string(), max.to_string()));
    }
    for (i, key) in query.sort.iter().enumerate() {
        params.push((format!("sort[{i}][field]"), key.field.clone()));
        params.push((format!("sort[{i}][direction]"), key.direction.as_str().to_string()));
    }
    if let Some(offset) = offset {
        params.push(("offset".to_string(), offset.to_string()));
    }
    params
}

/// Pulls a readable message out of an error body.
///
/// The service uses both `{"error": "NOT_FOUND"}` and
/// `{"error": {"type": "...", "message": "..."}}`.
fn service_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::String(kind) => Some(kind.clone()),
        Value::Object(error) => {
            let kind = error.get("type").and_then(Value::as_str);
            let message = error.get("message").and_then(Value::as_str);
            match (kind, message) {
                (Some(kind), Some(message)) => Some(format!("{kind}: {message}")),
                (Some(text), None) | (None, Some(text)) => Some(text.to_string()),
                (None, None) => None,
            }
        }
        _ => None,
    }
}

/// Maps a non-success HTTP status to the crate's error categories.
fn error_for_status(status: StatusCode, body: &str, resource: &str) -> Error {
    let message = service_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized { message },
        StatusCode::NOT_FOUND => Error::NotFound {
            resource: resource.to_string(),
        },
        _ => Error::Service {
            status: status.as_u16(),
            message,
        },
    }
}

impl RecordStore for AirtableStore {
    async fn list(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>> {
        let url = self.url(table, None)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            debug!(table, offset = offset.as_deref(), "Listing records");
            let request = self
                .client
                .get(url.clone())
                .query(&list_params(query, offset.as_deref()));
            let value = self.send(request, table).await?;
            let page: ListResponse = serde_json::from_value(value).map_err(|e| Error::Service {
                status: 0,
                message: format!("Unexpected list shape: {e}"),
            })?;

            records.extend(page.records);
            match page.offset {
                Some(next) if query.max_records.is_none_or(|max| records.len() < max) => {
                    offset = Some(next);
                }
                _ => break,
            }
        }

        if let Some(max) = query.max_records {
            records.truncate(max);
        }
        debug!(table, count = records.len(), "Listed records");
        Ok(records)
    }

    async fn get(&self, table: &str, id: &str) -> Result<Record> {
        debug!(table, id, "Fetching record");
        let url = self.url(table, Some(id))?;
        self.send_record(self.client.get(url), &format!("{table}/{id}"))
            .await
    }

    async fn create(&self, table: &str, fields: Fields) -> Result<Record> {
        debug!(table, "Creating record");
        let url = self.url(table, None)?;
        let body = WriteRequest {
            fields,
            typecast: true,
        };
        self.send_record(self.client.post(url).json(&body), table).await
    }

    async fn update(&self, table: &str, id: &str, fields: Fields) -> Result<Record> {
        debug!(table, id, "Updating record");
        let url = self.url(table, Some(id))?;
        let body = WriteRequest {
            fields,
            typecast: true,
        };
        self.send_record(self.client.patch(url).json(&body), &format!("{table}/{id}"))
            .await
    }

    async fn delete(&self, table: &str, id: &str) -> Result<()> {
        debug!(table, id, "Deleting record");
        let url = self.url(table, Some(id))?;
        self.send(self.client.delete(url), &format!("{table}/{id}"))
            .await
            .map(|_| ())
    }
}
