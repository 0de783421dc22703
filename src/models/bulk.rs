use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{EsError, Result};

/// Target of a single bulk action line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkMeta {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Action descriptor, serialized as `{"create": {"_index": ..., "_id": ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Create(BulkMeta),
    Index(BulkMeta),
    Update(BulkMeta),
    Delete(BulkMeta),
}

impl BulkAction {
    pub fn meta(&self) -> &BulkMeta {
        match self {
            BulkAction::Create(meta)
            | BulkAction::Index(meta)
            | BulkAction::Update(meta)
            | BulkAction::Delete(meta) => meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkEntry {
    action: BulkAction,
    source: Option<Value>,
}

impl BulkEntry {
    pub fn action(&self) -> &BulkAction {
        &self.action
    }
    pub fn source(&self) -> Option<&Value> {
        self.source.as_ref()
    }
}

/// Ordered bulk payload. Documents are serialized when pushed, so a body
/// that was built successfully can always be framed.
#[derive(Debug, Clone, Default)]
pub struct BulkRequestBody {
    entries: Vec<BulkEntry>,
}

fn to_value<T: Serialize + ?Sized>(document: &T) -> Result<Value> {
    serde_json::to_value(document).map_err(EsError::Serialization)
}

fn meta(index: &str, id: Option<&str>) -> BulkMeta {
    BulkMeta {
        index: index.to_string(),
        id: id.map(str::to_string),
    }
}

impl BulkRequestBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create fails on the server when the id already exists.
    pub fn create<T: Serialize + ?Sized>(
        &mut self,
        index: &str,
        id: &str,
        document: &T,
    ) -> Result<&mut Self> {
        let source = to_value(document)?;
        self.entries.push(BulkEntry {
            action: BulkAction::Create(meta(index, Some(id))),
            source: Some(source),
        });
        Ok(self)
    }

    /// Index creates or replaces. Without an id the server assigns one.
    pub fn index<T: Serialize + ?Sized>(
        &mut self,
        index: &str,
        id: Option<&str>,
        document: &T,
    ) -> Result<&mut Self> {
        let source = to_value(document)?;
        self.entries.push(BulkEntry {
            action: BulkAction::Index(meta(index, id)),
            source: Some(source),
        });
        Ok(self)
    }

    /// Partial update, merged into the stored document.
    pub fn update<T: Serialize + ?Sized>(
        &mut self,
        index: &str,
        id: &str,
        partial: &T,
    ) -> Result<&mut Self> {
        let partial = to_value(partial)?;
        self.entries.push(BulkEntry {
            action: BulkAction::Update(meta(index, Some(id))),
            source: Some(json!({ "doc": partial })),
        });
        Ok(self)
    }

    /// Delete carries no document line.
    pub fn delete(&mut self, index: &str, id: &str) -> &mut Self {
        self.entries.push(BulkEntry {
            action: BulkAction::Delete(meta(index, Some(id))),
            source: None,
        });
        self
    }

    pub fn entries(&self) -> &[BulkEntry] {
        &self.entries
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newline-delimited JSON, every line terminated by `\n`.
    pub fn to_ndjson(&self) -> Result<String> {
        let mut body = String::new();
        for entry in &self.entries {
            let action = serde_json::to_string(&entry.action).map_err(EsError::Serialization)?;
            body.push_str(&action);
            body.push('\n');
            if let Some(source) = &entry.source {
                body.push_str(&source.to_string());
                body.push('\n');
            }
        }
        Ok(body)
    }
}

/// Body of a `_bulk` response.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkResponse {
    pub took: u64,
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<Value>,
}

impl BulkResponse {
    /// Items whose action result carries an `error` object.
    pub fn failed_items(&self) -> Vec<&Value> {
        self.items
            .iter()
            .filter(|item| {
                item.as_object()
                    .and_then(|object| object.values().next())
                    .map(|result| result.get("error").is_some())
                    .unwrap_or(false)
            })
            .collect()
    }
}
