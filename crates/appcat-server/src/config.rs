use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Environment variable that overrides the listening port.
pub const PORT_ENV: &str = "PORT";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON snapshot rewritten after every successful mutation.
    pub data_file: PathBuf,
    /// Directory served for non-API GET requests, if present.
    pub static_dir: Option<PathBuf>,
    /// Write the built-in default catalog when `data_file` does not exist.
    pub seed_defaults: bool,
    pub max_upload_bytes: usize,
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_file: PathBuf::from("data.json"),
            static_dir: Some(PathBuf::from("static")),
            seed_defaults: true,
            max_upload_bytes: 10 * 1024 * 1024,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML config; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Defaults, then the optional TOML file, then the `PORT` variable.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    ServerError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.with_port_override(std::env::var(PORT_ENV).ok().as_deref())
    }

    /// Replace the port of `bind_addr` when `port` is set and non-empty.
    pub fn with_port_override(mut self, port: Option<&str>) -> ServerResult<Self> {
        match port.map(str::trim) {
            Some(p) if !p.is_empty() => {
                let port: u16 = p
                    .parse()
                    .map_err(|_| ServerError::Config(format!("invalid {PORT_ENV} value: {p:?}")))?;
                self.bind_addr.set_port(port);
                Ok(self)
            }
            _ => Ok(self),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `["*"]` allows any origin, an empty list disables CORS.
    pub allowed_origins: Vec<String>,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".into()],
            max_age_seconds: 3600,
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(c.data_file, PathBuf::from("data.json"));
        assert_eq!(c.max_upload_bytes, 10 * 1024 * 1024);
        assert!(c.seed_defaults);
        assert!(c.cors.allows_any_origin());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml_str(
            r#"
            data_file = "/var/lib/appcat/catalog.json"
            seed_defaults = false

            [cors]
            allowed_origins = ["https://dash.example.org"]
            "#,
        )
        .unwrap();
        assert_eq!(c.data_file, PathBuf::from("/var/lib/appcat/catalog.json"));
        assert!(!c.seed_defaults);
        assert_eq!(c.bind_addr.port(), 8080);
        assert!(!c.cors.allows_any_origin());
        assert_eq!(c.cors.max_age_seconds, 3600);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = ServerConfig::from_toml_str("bind_addr = 12").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn port_override() {
        let c = ServerConfig::default().with_port_override(Some("9090")).unwrap();
        assert_eq!(c.bind_addr.port(), 9090);

        let c = ServerConfig::default().with_port_override(Some("")).unwrap();
        assert_eq!(c.bind_addr.port(), 8080);

        assert!(ServerConfig::default().with_port_override(Some("http")).is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appcat.toml");
        std::fs::write(&path, "max_upload_bytes = 1024\n").unwrap();
        let c = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(c.max_upload_bytes, 1024);
        assert!(ServerConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
