use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use serde_with::skip_serializing_none;

pub fn match_all() -> Value {
    json!({ "match_all": {} })
}

/// Exact-value filter on one field.
pub fn term(field: &str, value: impl Into<Value>) -> Value {
    json!({ "term": { field: value.into() } })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Body of `_search`. Unset fields are left to server defaults.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    query: Value,
    from: Option<u64>,
    size: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sort: Vec<Value>,
}

impl SearchRequest {
    pub fn new(query: Value) -> Self {
        Self {
            query,
            from: None,
            size: None,
            sort: Vec::new(),
        }
    }

    pub fn match_all() -> Self {
        Self::new(match_all())
    }

    pub fn from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort_by(mut self, field: &str, order: SortOrder) -> Self {
        self.sort.push(json!({ field: order }));
        self
    }
}

/// Server-side script with bound parameters.
#[derive(Debug, Clone, Serialize)]
pub struct Script {
    lang: String,
    source: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    params: Map<String, Value>,
}

impl Script {
    /// Painless script.
    pub fn painless(source: impl Into<String>) -> Self {
        Self {
            lang: "painless".to_string(),
            source: source.into(),
            params: Map::new(),
        }
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}

/// Body of `_update_by_query`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateByQuery {
    script: Script,
    query: Value,
}

impl UpdateByQuery {
    pub fn new(query: Value, script: Script) -> Self {
        Self { script, query }
    }
}

/// Body of `_sql`. `format` goes on the query string, not in the body.
#[derive(Debug, Clone, Serialize)]
pub struct SqlQuery {
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fetch_size: Option<u32>,
    #[serde(skip)]
    format: Option<String>,
}

impl SqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            fetch_size: None,
            format: None,
        }
    }

    pub fn fetch_size(mut self, fetch_size: u32) -> Self {
        self.fetch_size = Some(fetch_size);
        self
    }

    /// `json` (default), `txt`, `csv`, `tsv`, ...
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn get_format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}
