use crate::error::{ConfigErrorKind, InfraError};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_TCP_ADDR: &str = "0.0.0.0:8888";
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.txt";
pub const DEFAULT_LOGIN_LOG_PATH: &str = "server_log.txt";
pub const DEFAULT_BLOCK_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tcp_addr: String,               // e.g. "0.0.0.0:8888"
    pub credentials_path: PathBuf,      // username:password, one per line
    pub login_log_path: PathBuf,        // append-only, one line per successful login
    pub block_threshold: u32,           // failures per address before the block hook fires
    pub block_command: Option<String>,  // e.g. "iptables -A INPUT -s {ip} -j DROP"
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tcp_addr: DEFAULT_TCP_ADDR.to_string(),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            login_log_path: PathBuf::from(DEFAULT_LOGIN_LOG_PATH),
            block_threshold: DEFAULT_BLOCK_THRESHOLD,
            block_command: None,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, InfraError> {
        let path = path.as_ref();
        let wrap = |source| InfraError::Config {
            path: path.to_path_buf(),
            source,
        };

        let data = std::fs::read_to_string(path).map_err(|e| wrap(ConfigErrorKind::Read(e)))?;
        Self::from_toml(&data).map_err(wrap)
    }

    pub fn from_toml(data: &str) -> Result<Self, ConfigErrorKind> {
        let cfg: Self = toml::from_str(data).map_err(ConfigErrorKind::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self, InfraError> {
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok()).map_err(InfraError::Env)
    }

    /// Builds a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigErrorKind> {
        let defaults = Self::default();

        let block_threshold = match get("LINEGATE_BLOCK_THRESHOLD") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigErrorKind::InvalidEnv("LINEGATE_BLOCK_THRESHOLD".to_string(), e.to_string()))?,
            None => defaults.block_threshold,
        };

        let cfg = Self {
            tcp_addr: get("LINEGATE_ADDR").unwrap_or(defaults.tcp_addr),
            credentials_path: get("LINEGATE_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_path),
            login_log_path: get("LINEGATE_LOGIN_LOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.login_log_path),
            block_threshold,
            block_command: get("LINEGATE_BLOCK_COMMAND").filter(|c| !c.trim().is_empty()),
        };

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, InfraError> {
        self.tcp_addr.parse().map_err(|e: std::net::AddrParseError| InfraError::Addr {
            addr: self.tcp_addr.clone(),
            message: e.to_string(),
        })
    }

    fn validate(&self) -> Result<(), ConfigErrorKind> {
        if self.block_threshold == 0 {
            return Err(ConfigErrorKind::Invalid {
                field: "block_threshold",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_defaults() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.tcp_addr, "0.0.0.0:8888");
        assert_eq!(cfg.block_threshold, 3);
    }

    #[test]
    fn env_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("LINEGATE_ADDR", "127.0.0.1:9000"),
            ("LINEGATE_CREDENTIALS", "/etc/linegate/creds"),
            ("LINEGATE_BLOCK_THRESHOLD", "5"),
            ("LINEGATE_BLOCK_COMMAND", "echo {ip}"),
        ]))
        .unwrap();

        assert_eq!(cfg.socket_addr().unwrap().port(), 9000);
        assert_eq!(cfg.credentials_path, PathBuf::from("/etc/linegate/creds"));
        assert_eq!(cfg.login_log_path, PathBuf::from("server_log.txt"));
        assert_eq!(cfg.block_threshold, 5);
        assert_eq!(cfg.block_command.as_deref(), Some("echo {ip}"));
    }

    #[test]
    fn env_rejects_bad_threshold() {
        let err = Config::from_lookup(lookup(&[("LINEGATE_BLOCK_THRESHOLD", "many")])).unwrap_err();
        assert!(matches!(err, ConfigErrorKind::InvalidEnv(ref k, _) if k == "LINEGATE_BLOCK_THRESHOLD"));

        let err = Config::from_lookup(lookup(&[("LINEGATE_BLOCK_THRESHOLD", "0")])).unwrap_err();
        assert!(matches!(err, ConfigErrorKind::Invalid { field: "block_threshold", .. }));
    }

    #[test]
    fn toml_partial_file() {
        let cfg = Config::from_toml(
            r#"
            tcp_addr = "127.0.0.1:4000"
            block_command = "pfctl -t blocked -T add {ip}"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.tcp_addr, "127.0.0.1:4000");
        assert_eq!(cfg.credentials_path, PathBuf::from("credentials.txt"));
        assert_eq!(cfg.block_threshold, 3);
        assert!(cfg.block_command.is_some());
    }

    #[test]
    fn bad_listen_address() {
        let cfg = Config {
            tcp_addr: "not-an-address".to_string(),
            ..Config::default()
        };
        assert!(matches!(cfg.socket_addr(), Err(InfraError::Addr { .. })));
    }
}
