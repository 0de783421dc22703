use semver::Version as Semver;
use serde::{Deserialize, Serialize};

/// Body of `GET /` on a cluster node.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerInfo {
    #[serde(rename = "name")]
    node_name: String,
    #[serde(rename = "cluster_name")]
    cluster_name: String,
    #[serde(rename = "cluster_uuid")]
    uuid: Option<String>,
    version: Version,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Version {
    number: String,
    #[serde(default)]
    lucene_version: Option<String>,
}

impl ServerInfo {
    pub fn get_node_name(&self) -> &String {
        &self.node_name
    }
    pub fn get_cluster_name(&self) -> &String {
        &self.cluster_name
    }
    pub fn get_uuid(&self) -> &Option<String> {
        &self.uuid
    }
    pub fn get_version(&self) -> &String {
        &self.version.number
    }
    pub fn get_lucene_version(&self) -> Option<&str> {
        self.version.lucene_version.as_deref()
    }

    /// Major version, or `None` when the node reports a non-semver string.
    pub fn get_version_major(&self) -> Option<u64> {
        Semver::parse(&self.version.number)
            .ok()
            .map(|version| version.major)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_root_endpoint_body() {
        let body = r#"{
            "name": "node-1",
            "cluster_name": "docker-cluster",
            "cluster_uuid": "Xz1",
            "version": { "number": "8.12.2", "lucene_version": "9.9.2" },
            "tagline": "You Know, for Search"
        }"#;
        let info: ServerInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.get_node_name(), "node-1");
        assert_eq!(info.get_cluster_name(), "docker-cluster");
        assert_eq!(info.get_version_major(), Some(8));
        assert_eq!(info.get_lucene_version(), Some("9.9.2"));
    }

    #[test]
    fn non_semver_version_has_no_major() {
        let body = r#"{"name":"n","cluster_name":"c","version":{"number":"8.x-SNAPSHOT-weird"}}"#;
        let info: ServerInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.get_uuid(), &None);
        assert_eq!(info.get_version_major(), None);
    }
}
