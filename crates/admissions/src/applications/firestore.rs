//! Firestore REST adapter for the `admission_application` collection.
//!
//! Documents come back in Firestore's typed-value encoding (`{"stringValue": ".."}`,
//! `{"mapValue": {"fields": {..}}}`, ...). They are flattened to plain JSON and decoded into
//! [`ApplicantRecord`] here. Fields of the wrong shape decode to defaults; a document that
//! cannot be flattened at all is skipped (and logged) when listing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use super::domain::{ApplicantRecord, ApplicationId};
use super::repository::{ApplicationRepository, RepositoryError};
use crate::config::FirestoreConfig;

const PAGE_SIZE: u32 = 300;
const REQUEST_TIMEOUT_SECS: u64 = 15;

pub struct FirestoreRepository {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreRepository {
    pub fn new(config: FirestoreConfig) -> Result<Self, RepositoryError> {
        let client = Client::builder()
            .user_agent(concat!("admission-desk/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|err| RepositoryError::Transport(err.to_string()))?;
        Ok(Self { client, config })
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.project_id,
            self.config.collection
        )
    }

    fn document_url(&self, id: &ApplicationId) -> Result<Url, RepositoryError> {
        let mut url = Url::parse(&self.collection_url())
            .map_err(|err| RepositoryError::Transport(format!("invalid base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| RepositoryError::Transport("base url cannot hold a path".to_string()))?
            .push(&id.0);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.config.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        };
        match &self.config.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json(&self, request: RequestBuilder) -> Result<Option<Value>, RepositoryError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| RepositoryError::Transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|err| RepositoryError::Transport(err.to_string()))?;
        if !status.is_success() {
            let preview: String = body.chars().take(180).collect();
            return Err(RepositoryError::Unavailable(format!(
                "firestore returned {status}: {preview}"
            )));
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|err| RepositoryError::Transport(format!("invalid JSON response: {err}")))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsPage {
    #[serde(default)]
    documents: Vec<Value>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[async_trait]
impl ApplicationRepository for FirestoreRepository {
    async fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        if !is_document_id(&id.0) {
            debug!(application_id = %id, "rejecting malformed document id");
            return Ok(None);
        }
        let url = self.document_url(id)?;
        debug!(application_id = %id, "fetching application document");
        match self.get_json(self.client.get(url)).await? {
            Some(document) => decode_document(&document).map(Some),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        let url = self.collection_url();
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let Some(body) = self.get_json(request).await? else {
                warn!(collection = %self.config.collection, "collection not found");
                break;
            };
            let page: ListDocumentsPage = serde_json::from_value(body)
                .map_err(|err| RepositoryError::Transport(format!("invalid list page: {err}")))?;

            for document in &page.documents {
                match decode_document(document) {
                    Ok(record) => records.push(record),
                    Err(RepositoryError::InvalidDocument { id, reason }) => {
                        warn!(application_id = %id, %reason, "skipping undecodable document");
                    }
                    Err(err) => return Err(err),
                }
            }

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = records.len(), "listed application documents");
        Ok(records)
    }
}

/// Firestore document ids are single path segments; `.` and `..` are reserved.
fn is_document_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains('/')
}

/// Decode one Firestore document resource into an applicant record.
pub fn decode_document(document: &Value) -> Result<ApplicantRecord, RepositoryError> {
    let name = document
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let id = name.rsplit('/').next().unwrap_or_default().to_string();

    let invalid = |reason: String| RepositoryError::InvalidDocument {
        id: id.clone(),
        reason,
    };

    let mut fields = match document.get("fields") {
        Some(Value::Object(fields)) => decode_fields(fields).map_err(invalid)?,
        Some(other) => return Err(invalid(format!("fields must be a map, got {other}"))),
        None => Map::new(),
    };
    fields.insert("id".to_string(), Value::String(id.clone()));

    serde_json::from_value(Value::Object(fields)).map_err(|err| invalid(err.to_string()))
}

fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, String> {
    fields
        .iter()
        .map(|(key, value)| {
            decode_value(value)
                .map(|decoded| (key.clone(), decoded))
                .map_err(|err| format!("{key}: {err}"))
        })
        .collect()
}

/// Flatten a Firestore typed value into plain JSON.
pub fn decode_value(value: &Value) -> Result<Value, String> {
    let Some(object) = value.as_object() else {
        return Err(format!("expected typed value object, got {value}"));
    };
    let Some((kind, inner)) = object.iter().next() else {
        return Ok(Value::Null);
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(Value::Bool(inner.as_bool().unwrap_or_default())),
        "integerValue" => {
            let parsed = match inner {
                Value::String(raw) => raw.parse::<i64>().map_err(|err| err.to_string())?,
                Value::Number(number) => number
                    .as_i64()
                    .ok_or_else(|| format!("integer out of range: {number}"))?,
                other => return Err(format!("invalid integerValue {other}")),
            };
            Ok(Value::Number(Number::from(parsed)))
        }
        "doubleValue" => match inner {
            Value::Number(_) => Ok(inner.clone()),
            // NaN and infinities arrive as strings and have no JSON number form.
            Value::String(raw) => Ok(Value::String(raw.clone())),
            other => Err(format!("invalid doubleValue {other}")),
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "geoPointValue" => Ok(inner.clone()),
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => decode_fields(fields).map(Value::Object),
            _ => Ok(Value::Object(Map::new())),
        },
        "arrayValue" => match inner.get("values") {
            Some(Value::Array(values)) => values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            _ => Ok(Value::Array(Vec::new())),
        },
        other => Err(format!("unsupported value type '{other}'")),
    }
}
