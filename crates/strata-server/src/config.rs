use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_pipeline::DEFAULT_CHUNK_SIZE;

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Root directory of the durable block backend.
    pub data_root: PathBuf,
    /// Chunk size for object ingestion, in bytes.
    pub chunk_size: usize,
    /// Maximum accepted upload body, in bytes.
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().expect("valid literal address"),
            data_root: PathBuf::from("data"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_upload_size: 100 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load a config from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| ServerError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(c.data_root, PathBuf::from("data"));
        assert_eq!(c.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(c.max_upload_size, 100 * 1024 * 1024);
    }

    #[test]
    fn load_partial_toml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        std::fs::write(&path, "bind_addr = \"0.0.0.0:9090\"\n").unwrap();

        let c = ServerConfig::load(&path).unwrap();
        assert_eq!(c.bind_addr, "0.0.0.0:9090".parse::<SocketAddr>().unwrap());
        assert_eq!(c.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        std::fs::write(&path, "bind_addr = not quoted").unwrap();

        let err = ServerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
