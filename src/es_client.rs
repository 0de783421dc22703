use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Client, ClientBuilder, Method, RequestBuilder};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{EsError, Result};
use crate::models::response::EsResponse;
use crate::models::server_info::ServerInfo;

/// Transport settings shared by every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportPolicy {
    pub max_idle_per_host: usize,
    /// Longest wait for the next read once the request is written, the
    /// response headers included. No deadline covers the whole exchange, so
    /// a slow upload or a long streamed body is not cut off while it moves.
    pub read_timeout: Duration,
    pub connect_timeout: Duration,
}

pub const TRANSPORT_POLICY: TransportPolicy = TransportPolicy {
    max_idle_per_host: 10,
    read_timeout: Duration::from_secs(60),
    connect_timeout: Duration::from_secs(10),
};

impl TransportPolicy {
    fn apply(&self, builder: ClientBuilder) -> ClientBuilder {
        builder
            .pool_max_idle_per_host(self.max_idle_per_host)
            .read_timeout(self.read_timeout)
            .connect_timeout(self.connect_timeout)
            .min_tls_version(reqwest::tls::Version::TLS_1_1)
    }
}

const REDACTED_VALUE: &str = "***";

#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: Option<String>,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED_VALUE))
            .finish()
    }
}

/// Request body together with its content type.
pub(crate) struct Payload {
    bytes: Vec<u8>,
    content_type: &'static str,
}

impl Payload {
    pub(crate) fn json<T: Serialize + ?Sized>(body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(EsError::Serialization)?;
        Ok(Self {
            bytes,
            content_type: "application/json",
        })
    }

    pub(crate) fn ndjson(body: String) -> Self {
        Self {
            bytes: body.into_bytes(),
            content_type: "application/x-ndjson",
        }
    }
}

/// Splits a comma separated host list, keeping order and duplicates.
pub fn split_hosts(host_list: &str) -> Result<Vec<Url>> {
    if host_list.trim().is_empty() {
        return Err(EsError::NoEndpoints);
    }
    host_list
        .split(',')
        .map(str::trim)
        .map(|host| {
            let invalid = |reason: String| EsError::InvalidEndpoint {
                endpoint: host.to_string(),
                reason,
            };
            if host.is_empty() {
                return Err(invalid("empty entry".to_string()));
            }
            let url = Url::parse(host).map_err(|e| invalid(e.to_string()))?;
            match url.scheme() {
                "http" | "https" => Ok(url),
                other => Err(invalid(format!("unsupported scheme '{}'", other))),
            }
        })
        .collect()
}

fn load_certificates(path: &Path) -> Result<Vec<Certificate>> {
    let failed = |reason: String| EsError::Certificates {
        path: path.display().to_string(),
        reason,
    };
    let mut certs = Vec::new();
    let entries = std::fs::read_dir(path).map_err(|e| failed(e.to_string()))?;
    for entry in entries {
        let entry = entry.map_err(|e| failed(e.to_string()))?;
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if let Ok(content) = std::fs::read(&file_path) {
            if let Ok(cert) = Certificate::from_pem(&content) {
                certs.push(cert);
            }
        }
    }
    Ok(certs)
}

/// Builds an [`EsClient`] with the fixed transport policy. Auth and extra
/// trust roots are the only knobs.
#[derive(Debug, Clone)]
pub struct EsClientBuilder {
    hosts: String,
    basic_auth: Option<BasicAuth>,
    root_certificates: Vec<PathBuf>,
    insecure: bool,
}

impl EsClientBuilder {
    pub fn new(hosts: &str) -> Self {
        Self {
            hosts: hosts.to_string(),
            basic_auth: None,
            root_certificates: Vec::new(),
            insecure: false,
        }
    }

    pub fn basic_auth(mut self, username: &str, password: Option<&str>) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.to_string(),
            password: password.map(str::to_string),
        });
        self
    }

    /// Directory of PEM files added to the trust store.
    pub fn root_certificates(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root_certificates.push(dir.into());
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn get_hosts(&self) -> &str {
        &self.hosts
    }

    /// Parses the hosts, builds the transport and pings the cluster. Nothing
    /// is returned unless the ping succeeds.
    pub async fn build(self) -> Result<EsClient> {
        let endpoints = split_hosts(&self.hosts)?;

        let mut builder = TRANSPORT_POLICY.apply(Client::builder());
        if self.insecure {
            warn!("TLS certificate verification is disabled for {}", self.hosts);
            builder = builder.danger_accept_invalid_certs(true);
        }
        for dir in &self.root_certificates {
            for cert in load_certificates(dir)? {
                builder = builder.add_root_certificate(cert);
            }
        }
        let http_client = builder.build().map_err(EsError::ClientBuild)?;

        let client = EsClient {
            endpoints,
            http_client,
            basic_auth: self.basic_auth,
            next: AtomicUsize::new(0),
        };
        client.probe().await?;
        info!("Connected to {} endpoint(s): {}", client.endpoints.len(), self.hosts);
        Ok(client)
    }
}

/// Pooled client for one cluster. Requests rotate over the endpoints.
#[derive(Debug)]
pub struct EsClient {
    endpoints: Vec<Url>,
    http_client: Client,
    basic_auth: Option<BasicAuth>,
    next: AtomicUsize,
}

impl EsClient {
    pub async fn build(host_list: &str) -> Result<Self> {
        EsClientBuilder::new(host_list).build().await
    }

    pub fn builder(host_list: &str) -> EsClientBuilder {
        EsClientBuilder::new(host_list)
    }

    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    fn next_endpoint(&self) -> &Url {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.endpoints.len();
        &self.endpoints[idx]
    }

    fn inject_auth(&self, request_builder: RequestBuilder) -> RequestBuilder {
        match &self.basic_auth {
            Some(auth) => request_builder.basic_auth(&auth.username, auth.password.as_ref()),
            None => request_builder,
        }
    }

    fn url_for(base: &Url, segments: &[&str]) -> Result<Url> {
        let mut url = base.clone();
        if segments.is_empty() {
            return Ok(url);
        }
        url.path_segments_mut()
            .map_err(|_| EsError::InvalidEndpoint {
                endpoint: base.to_string(),
                reason: "cannot be a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn probe(&self) -> Result<()> {
        let base = self.next_endpoint();
        self.send_to(base, Method::HEAD, &[], &[], None)
            .await
            .map(|_| ())
            .map_err(|e| EsError::Unreachable {
                endpoint: base.origin().ascii_serialization(),
                reason: e.to_string(),
            })
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        payload: Option<Payload>,
    ) -> Result<EsResponse> {
        let base = self.next_endpoint();
        self.send_to(base, method, segments, query, payload).await
    }

    async fn send_to(
        &self,
        base: &Url,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        payload: Option<Payload>,
    ) -> Result<EsResponse> {
        let url = Self::url_for(base, segments)?;
        let path = url.path().to_string();

        let mut request_builder = self.http_client.request(method.clone(), url);
        if !query.is_empty() {
            request_builder = request_builder.query(query);
        }
        if let Some(payload) = payload {
            request_builder = request_builder
                .header(CONTENT_TYPE, payload.content_type)
                .body(payload.bytes);
        }
        request_builder = self.inject_auth(request_builder);

        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed: {}", method, path, e);
                return Err(EsError::Transport(e));
            }
        };
        let status = response.status();
        let body = response.text().await?;
        info!("{} {} -> {}", method, path, status);
        debug!("{}", body);

        if !status.is_success() {
            return Err(EsError::Status { status, body });
        }
        Ok(EsResponse::new(status, body))
    }

    /// `HEAD /` against the next endpoint.
    pub async fn ping(&self) -> Result<()> {
        self.send(Method::HEAD, &[], &[], None).await.map(|_| ())
    }

    pub async fn server_info(&self) -> Result<ServerInfo> {
        self.send(Method::GET, &[], &[], None).await?.json()
    }

    pub async fn print_server_info(&self, prefix: &str) -> Result<()> {
        let server_info = self.server_info().await?;
        info!(
            "{}: node={}, cluster={}, uuid={:?}, version={}, lucene={:?}",
            prefix,
            server_info.get_node_name(),
            server_info.get_cluster_name(),
            server_info.get_uuid(),
            server_info.get_version(),
            server_info.get_lucene_version()
        );
        Ok(())
    }
}
