//! Pooled clients for Elasticsearch-compatible clusters.
//!
//! A [`ClientRegistry`] hands out one [`EsClient`] per logical cluster name.
//! Each client owns a connection-pooling HTTP transport with a fixed policy
//! (10 idle connections per host, 10 s connect timeout, 60 s response
//! timeout, TLS 1.1 or newer) and is only returned after the cluster
//! answered a ping.
//!
//! ```rust,no_run
//! use es_pool::{ClientRegistry, SearchRequest};
//!
//! # async fn run() -> es_pool::Result<()> {
//! let registry = ClientRegistry::new();
//! let client = registry
//!     .get_or_create("main", "https://node1:9200,https://node2:9200")
//!     .await?;
//! let response = client.search("places", &SearchRequest::match_all().size(10)).await?;
//! println!("{}", response.body());
//! # Ok(())
//! # }
//! ```

pub mod conf;
pub mod demo;
mod documents;
pub mod error;
pub mod es_client;
mod indices;
pub mod models;
pub mod registry;
mod search;

pub use error::{EsError, Result};
pub use es_client::{EsClient, EsClientBuilder};
pub use models::bulk::{BulkAction, BulkRequestBody, BulkResponse};
pub use models::query::{SearchRequest, Script, SortOrder, SqlQuery, UpdateByQuery};
pub use models::response::{EsResponse, GetResponse, SearchResponse};
pub use registry::ClientRegistry;
