use std::time::Duration;

use logging_timer::timer;
use reqwest::Method;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::error::{EsError, Result};
use crate::es_client::{EsClient, Payload};
use crate::models::bulk::{BulkRequestBody, BulkResponse};
use crate::models::response::EsResponse;

/// Server side timeouts are sent in milliseconds.
fn as_millis(timeout: Duration) -> String {
    format!("{}ms", timeout.as_millis())
}

impl EsClient {
    /// `PUT /{index}/_create/{id}`. Fails with 409 if the id exists.
    pub async fn create_document<T: Serialize + ?Sized>(
        &self,
        index: &str,
        id: &str,
        document: &T,
        timeout: Option<Duration>,
    ) -> Result<EsResponse> {
        let payload = Payload::json(document)?;
        let query: Vec<(&str, String)> = timeout
            .map(|timeout| ("timeout", as_millis(timeout)))
            .into_iter()
            .collect();
        self.send(Method::PUT, &[index, "_create", id], &query, Some(payload))
            .await
    }

    pub async fn get_document(&self, index: &str, id: &str) -> Result<EsResponse> {
        self.send(Method::GET, &[index, "_doc", id], &[], None).await
    }

    /// Merges `partial` into the stored document.
    pub async fn update_document<T: Serialize + ?Sized>(
        &self,
        index: &str,
        id: &str,
        partial: &T,
    ) -> Result<EsResponse> {
        let partial = serde_json::to_value(partial).map_err(EsError::Serialization)?;
        let payload = Payload::json(&json!({ "doc": partial }))?;
        self.send(Method::POST, &[index, "_update", id], &[], Some(payload))
            .await
    }

    pub async fn delete_document(&self, index: &str, id: &str) -> Result<EsResponse> {
        self.send(Method::DELETE, &[index, "_doc", id], &[], None)
            .await
    }

    /// Submits the whole body as one `_bulk` call. Per-item failures do not
    /// fail the call; they are logged and left in the response.
    pub async fn bulk(&self, body: &BulkRequestBody) -> Result<EsResponse> {
        let _tmr = timer!("BULK");
        let payload = Payload::ndjson(body.to_ndjson()?);
        let response = self.send(Method::POST, &["_bulk"], &[], Some(payload)).await?;
        if let Ok(summary) = response.json::<BulkResponse>() {
            if summary.errors {
                warn!(
                    "Bulk request finished with {} failed item(s) out of {}",
                    summary.failed_items().len(),
                    body.len()
                );
            }
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_rendered_in_millis() {
        assert_eq!(as_millis(Duration::from_secs(5)), "5000ms");
    }
}
