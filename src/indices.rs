use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::error::{EsError, Result};
use crate::es_client::{EsClient, Payload};
use crate::models::response::EsResponse;

impl EsClient {
    /// `PUT /{index}` with settings and mappings. An existing index is
    /// reported as a 400 `Status` error like any other rejection.
    pub async fn create_index(&self, index: &str, body: &Value) -> Result<EsResponse> {
        let payload = Payload::json(body)?;
        self.send(Method::PUT, &[index], &[], Some(payload)).await
    }

    pub async fn delete_index(&self, index: &str) -> Result<EsResponse> {
        self.send(Method::DELETE, &[index], &[], None).await
    }

    pub async fn index_exists(&self, index: &str) -> Result<bool> {
        match self.send(Method::HEAD, &[index], &[], None).await {
            Ok(_) => Ok(true),
            Err(EsError::Status { status, .. }) if status == StatusCode::NOT_FOUND => Ok(false),
            Err(e) => Err(e),
        }
    }
}
