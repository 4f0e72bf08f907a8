//! Gateway configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! environment variables. The signing key is never part of the file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default JSON-RPC endpoint (a local Hardhat or Anvil node).
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Default port for the HTTP server.
pub const DEFAULT_PORT: u16 = 3001;

/// Default location of the deployment record written by the deploy script.
pub const DEFAULT_DEPLOYMENT_PATH: &str = "deployments/local/MyToken.json";

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },
}

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON-RPC endpoint of the blockchain node.
    pub rpc_url: String,
    /// Socket address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// Path to the deployment record (`{address, abi}` JSON).
    pub deployment_path: PathBuf,
    /// Append-only JSONL audit log for write operations (disabled when unset).
    pub audit_log_path: Option<PathBuf>,
    /// Encrypted V3 keystore holding the signing key.
    pub keystore_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            deployment_path: PathBuf::from(DEFAULT_DEPLOYMENT_PATH),
            audit_log_path: None,
            keystore_path: None,
        }
    }
}

impl Config {
    /// Parses a configuration from a YAML string. Missing keys take defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads a configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Loads the configuration from `path` (or defaults) and applies
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies overrides looked up by environment variable name.
    ///
    /// Recognized keys: `RPC_URL`, `PORT`, `DEPLOYMENT_PATH`,
    /// `AUDIT_LOG_PATH`, `KEYSTORE_PATH`. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("RPC_URL") {
            self.rpc_url = url;
        }
        if let Some(port) = get("PORT") {
            let port: u16 = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: "PORT",
                value: port.clone(),
            })?;
            self.listen_addr.set_port(port);
        }
        if let Some(path) = get("DEPLOYMENT_PATH") {
            self.deployment_path = PathBuf::from(path);
        }
        if let Some(path) = get("AUDIT_LOG_PATH") {
            self.audit_log_path = Some(PathBuf::from(path));
        }
        if let Some(path) = get("KEYSTORE_PATH") {
            self.keystore_path = Some(PathBuf::from(path));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_local_node() {
        let config = Config::default();
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.listen_addr, "0.0.0.0:3001".parse().unwrap());
        assert_eq!(
            config.deployment_path,
            PathBuf::from("deployments/local/MyToken.json")
        );
        assert!(config.audit_log_path.is_none());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("rpc_url: http://node:8545\n").unwrap();
        assert_eq!(config.rpc_url, "http://node:8545");
        assert_eq!(config.listen_addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn port_override_keeps_configured_host() {
        let mut config = Config::from_yaml("listen_addr: 127.0.0.1:8080\n").unwrap();
        config.apply_overrides(env(&[("PORT", "4000")])).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:4000".parse().unwrap());
    }

    #[test]
    fn full_yaml() {
        let yaml = r#"
rpc_url: http://10.0.0.2:8545
listen_addr: 0.0.0.0:8080
deployment_path: /srv/token.json
audit_log_path: /var/log/erc20-api/audit.jsonl
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.deployment_path, PathBuf::from("/srv/token.json"));
        assert_eq!(
            config.audit_log_path,
            Some(PathBuf::from("/var/log/erc20-api/audit.jsonl"))
        );
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::from_yaml("rpc_url: http://file:8545\n").unwrap();
        config
            .apply_overrides(env(&[
                ("RPC_URL", "http://env:8545"),
                ("PORT", "4000"),
                ("DEPLOYMENT_PATH", "d.json"),
            ]))
            .unwrap();
        assert_eq!(config.rpc_url, "http://env:8545");
        assert_eq!(config.listen_addr.port(), 4000);
        assert_eq!(config.listen_addr.ip().to_string(), "0.0.0.0");
        assert_eq!(config.deployment_path, PathBuf::from("d.json"));
    }

    #[test]
    fn empty_env_values_ignored() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("RPC_URL", ""), ("PORT", "  ")]))
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_port_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(env(&[("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let result = Config::from_file(Path::new("/nonexistent/erc20-api.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn from_file_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "keystore_path: keys/signer.json\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.keystore_path, Some(PathBuf::from("keys/signer.json")));
    }
}
