//! Startup configuration read from the environment.

use std::{
    env,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

pub const DEFAULT_UPLOAD_DIR: &str = "uploads/";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid HOST {0:?}: expected an IP address")]
    Host(String),

    #[error("invalid PORT {0:?}: expected a number between 0 and 65535")]
    Port(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub upload_dir: PathBuf,
    pub addr: SocketAddr,
}

impl Config {
    /// Reads `UPLOAD_DIR`, `HOST` and `PORT`, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upload_dir = lookup("UPLOAD_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host.trim().parse().map_err(|_| ConfigError::Host(host.clone()))?;

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Port(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            upload_dir,
            addr: SocketAddr::new(ip, port),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.upload_dir, PathBuf::from("uploads/"));
        assert_eq!(config.addr, "127.0.0.1:5000".parse().unwrap());
    }

    #[test]
    fn overrides_from_env() {
        let config = Config::from_lookup(lookup_from(&[
            ("UPLOAD_DIR", "/srv/images"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8030"),
        ]))
        .unwrap();
        assert_eq!(config.upload_dir, PathBuf::from("/srv/images"));
        assert_eq!(config.addr, "0.0.0.0:8030".parse().unwrap());
    }

    #[test]
    fn rejects_bad_port() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Port(ref p) if p == "http"));
    }

    #[test]
    fn rejects_bad_host() {
        let err = Config::from_lookup(lookup_from(&[("HOST", "not-an-ip")])).unwrap_err();
        assert!(matches!(err, ConfigError::Host(_)));
    }
}
