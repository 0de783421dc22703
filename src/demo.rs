//! Sample geo-point dataset driven by the `es-pool` binary.
//!
//! Documents have an integer `id` and a `location` geo-point and live under
//! ids of the form `test_{id}`.

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;
use crate::models::bulk::BulkRequestBody;
use crate::models::query::{self, SearchRequest, SortOrder, Script, SqlQuery, UpdateByQuery};

pub const DEFAULT_INDEX: &str = "test_index";
pub const CREATE_TIMEOUT: Duration = Duration::from_secs(5);
pub const BATCH_IDS: RangeInclusive<i64> = 2..=9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoDocument {
    pub id: i64,
    pub location: GeoPoint,
}

impl GeoDocument {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            location: GeoPoint {
                lat: 3.1415,
                lon: 110.2567,
            },
        }
    }
}

pub fn document_id(id: i64) -> String {
    format!("test_{}", id)
}

pub fn mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "integer" },
                "location": { "type": "geo_point" }
            }
        }
    })
}

/// One create action per id, in iteration order.
pub fn batch(index: &str, ids: RangeInclusive<i64>) -> Result<BulkRequestBody> {
    let mut body = BulkRequestBody::new();
    for id in ids {
        body.create(index, &document_id(id), &GeoDocument::new(id))?;
    }
    Ok(body)
}

pub fn relocation() -> Value {
    let location = GeoPoint {
        lat: 3.5555,
        lon: 110.66666,
    };
    json!({ "location": location })
}

/// Moves document 1 and renumbers it to 10.
pub fn renumber() -> UpdateByQuery {
    let script = Script::painless(
        "ctx._source.location = params.location; ctx._source.id = params.id;",
    )
    .param("location", json!({ "lat": 3.9999, "lon": 110.8888 }))
    .param("id", 10);
    UpdateByQuery::new(query::term("id", 1), script)
}

pub fn delete_filter() -> Value {
    query::term("id", 2)
}

pub fn sql(index: &str) -> SqlQuery {
    SqlQuery::new(format!(
        "select id,location from {} order by id desc limit 2",
        index
    ))
}

pub fn first_page() -> SearchRequest {
    SearchRequest::new(json!({ "bool": { "must": [query::match_all()] } }))
        .from(0)
        .size(2)
        .sort_by("id", SortOrder::Desc)
}
