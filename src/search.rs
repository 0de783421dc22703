use logging_timer::timer;
use reqwest::Method;
use serde_json::{json, Value};

use crate::error::Result;
use crate::es_client::{EsClient, Payload};
use crate::models::query::{SearchRequest, SqlQuery, UpdateByQuery};
use crate::models::response::{CountResponse, EsResponse};

impl EsClient {
    pub async fn search(&self, index: &str, request: &SearchRequest) -> Result<EsResponse> {
        let _tmr = timer!("SEARCH");
        let payload = Payload::json(request)?;
        self.send(Method::POST, &[index, "_search"], &[], Some(payload))
            .await
    }

    /// `POST /_sql`. The index is named inside the statement.
    pub async fn sql_query(&self, query: &SqlQuery) -> Result<EsResponse> {
        let _tmr = timer!("SQL_QUERY");
        let payload = Payload::json(query)?;
        let params: Vec<(&str, String)> = query
            .get_format()
            .map(|format| ("format", format.to_string()))
            .into_iter()
            .collect();
        self.send(Method::POST, &["_sql"], &params, Some(payload))
            .await
    }

    pub async fn update_by_query(&self, index: &str, request: &UpdateByQuery) -> Result<EsResponse> {
        let _tmr = timer!("UPDATE_BY_QUERY");
        let payload = Payload::json(request)?;
        self.send(Method::POST, &[index, "_update_by_query"], &[], Some(payload))
            .await
    }

    pub async fn delete_by_query(&self, index: &str, query: &Value) -> Result<EsResponse> {
        let _tmr = timer!("DELETE_BY_QUERY");
        let payload = Payload::json(&json!({ "query": query }))?;
        self.send(Method::POST, &[index, "_delete_by_query"], &[], Some(payload))
            .await
    }

    pub async fn count(&self, index: &str, query: &Value) -> Result<u64> {
        let payload = Payload::json(&json!({ "query": query }))?;
        let response = self
            .send(Method::POST, &[index, "_count"], &[], Some(payload))
            .await?;
        let count: CountResponse = response.json()?;
        Ok(count.count)
    }
}
