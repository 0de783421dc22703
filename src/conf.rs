use std::path::{Path, PathBuf};

use twelf::reexports::serde::{Deserialize, Serialize};
use twelf::{config, Layer};

use crate::es_client::EsClientBuilder;

#[config]
#[derive(Debug, Default)]
pub struct Config {
    clusters: Vec<Cluster>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Cluster {
    name: String,
    hosts: String,
    #[serde(default)]
    basic_auth: Option<BasicAuth>,
    #[serde(default)]
    root_certificates: Vec<String>,
    #[serde(default)]
    insecure: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BasicAuth {
    username: String,
    #[serde(default)]
    password: Option<String>,
}

impl Config {
    /// Loads a TOML file, or JSON when the extension is `.json`.
    pub fn load(path: &Path) -> Result<Self, twelf::Error> {
        let path = PathBuf::from(path);
        let layer = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Layer::Json(path),
            _ => Layer::Toml(path),
        };
        Self::with_layers(&[layer])
    }

    pub fn get_clusters(&self) -> &Vec<Cluster> {
        &self.clusters
    }

    pub fn get_cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|cluster| cluster.name == name)
    }
}

impl BasicAuth {
    pub fn get_username(&self) -> &String {
        &self.username
    }
    pub fn get_password(&self) -> &Option<String> {
        &self.password
    }
}

impl Cluster {
    pub fn get_name(&self) -> &String {
        &self.name
    }
    pub fn get_hosts(&self) -> &String {
        &self.hosts
    }
    pub fn get_root_certificates(&self) -> &Vec<String> {
        &self.root_certificates
    }
    pub fn has_basic_auth(&self) -> bool {
        self.basic_auth.is_some()
    }
    pub fn is_insecure(&self) -> bool {
        self.insecure
    }

    pub fn to_builder(&self) -> EsClientBuilder {
        let mut builder = EsClientBuilder::new(&self.hosts).insecure(self.insecure);
        if let Some(auth) = &self.basic_auth {
            builder = builder.basic_auth(auth.get_username(), auth.get_password().as_deref());
        }
        for dir in &self.root_certificates {
            builder = builder.root_certificates(dir);
        }
        builder
    }
}
