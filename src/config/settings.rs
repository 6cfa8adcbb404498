//! Server settings loaded from environment variables.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

/// Settings for the `tip-pool-server` binary.
///
/// Loaded once at startup via [`ServerSettings::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Directory holding `roles.yaml` and `pools.yaml`; the built-in policy is
    /// used when unset.
    pub config_dir: Option<PathBuf>,
    /// JSON file the roster and history are persisted to.
    pub data_file: PathBuf,
}

impl ServerSettings {
    /// Loads settings from the process environment, after reading a `.env`
    /// file from the working directory if one exists.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `TIP_POOL_LISTEN_ADDR` | `127.0.0.1:3000` |
    /// | `TIP_POOL_CONFIG_DIR` | built-in policy |
    /// | `TIP_POOL_DATA_FILE` | `tip_pool_data.json` |
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `TIP_POOL_LISTEN_ADDR` is set but cannot be
    /// parsed as a [`SocketAddr`].
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings from an env file without touching the process
    /// environment. Variables already set in the process take precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the file cannot be opened and
    /// `ConfigParseError` if a line is not a valid assignment.
    pub fn from_env_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let entries = dotenvy::from_path_iter(path)
            .map_err(|_| EngineError::ConfigNotFound {
                path: path.display().to_string(),
            })?
            .collect::<Result<HashMap<String, String>, _>>()
            .map_err(|e| EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| entries.get(key).cloned()))
    }

    /// Loads settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup("TIP_POOL_LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let listen_addr = listen_addr
            .parse()
            .map_err(|_| EngineError::InvalidConfig {
                message: format!("TIP_POOL_LISTEN_ADDR '{}' is not a socket address", listen_addr),
            })?;

        let config_dir = lookup("TIP_POOL_CONFIG_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let data_file = lookup("TIP_POOL_DATA_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("tip_pool_data.json"));

        Ok(Self {
            listen_addr,
            config_dir,
            data_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = ServerSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.listen_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(settings.config_dir, None);
        assert_eq!(settings.data_file, PathBuf::from("tip_pool_data.json"));
    }

    #[test]
    fn test_values_are_read_from_lookup() {
        let settings = ServerSettings::from_lookup(lookup_from(&[
            ("TIP_POOL_LISTEN_ADDR", "0.0.0.0:8080"),
            ("TIP_POOL_CONFIG_DIR", "/etc/tip-pool"),
            ("TIP_POOL_DATA_FILE", "/var/lib/tip-pool/data.json"),
        ]))
        .unwrap();

        assert_eq!(settings.listen_addr.port(), 8080);
        assert_eq!(settings.config_dir, Some(PathBuf::from("/etc/tip-pool")));
        assert_eq!(
            settings.data_file,
            PathBuf::from("/var/lib/tip-pool/data.json")
        );
    }

    #[test]
    fn test_invalid_listen_addr_is_rejected() {
        let result =
            ServerSettings::from_lookup(lookup_from(&[("TIP_POOL_LISTEN_ADDR", "not-an-addr")]));
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_env_file_values_are_read() {
        let path = std::env::temp_dir().join(format!("tip_pool_{}.env", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "# server\nTIP_POOL_LISTEN_ADDR=0.0.0.0:9090\nTIP_POOL_DATA_FILE=\"/srv/tips.json\"\n",
        )
        .unwrap();

        let settings = ServerSettings::from_env_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.listen_addr.port(), 9090);
        assert_eq!(settings.data_file, PathBuf::from("/srv/tips.json"));
    }

    #[test]
    fn test_missing_env_file_is_reported() {
        let result = ServerSettings::from_env_file("/nonexistent/tip-pool.env");
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }
}
