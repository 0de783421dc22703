use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{EsError, Result};

/// Raw outcome of a successful call. The transport response has already been
/// read to the end and released when this is handed out.
#[derive(Debug, Clone)]
pub struct EsResponse {
    status: StatusCode,
    body: String,
}

impl EsResponse {
    pub(crate) fn new(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
    pub fn body(&self) -> &str {
        &self.body
    }
    pub fn into_body(self) -> String {
        self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(EsError::Decode)
    }
}

/// Body of `GET /{index}/_doc/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetResponse<T> {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub found: bool,
    #[serde(rename = "_source")]
    pub source: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse<T> {
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
    pub hits: Hits<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hits<T> {
    pub total: Option<Total>,
    pub hits: Vec<Hit<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Total {
    pub value: u64,
    pub relation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: Option<T>,
}

impl<T> SearchResponse<T> {
    pub fn sources(&self) -> impl Iterator<Item = &T> {
        self.hits.hits.iter().filter_map(|hit| hit.source.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Shared shape of `_update_by_query` and `_delete_by_query` results.
#[derive(Debug, Clone, Deserialize)]
pub struct ByQueryResponse {
    pub took: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub deleted: u64,
    #[serde(default)]
    pub version_conflicts: u64,
    #[serde(default)]
    pub failures: Vec<serde_json::Value>,
}
