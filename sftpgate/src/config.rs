use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use sftpgate_common::helpers::fs::secure_file;
use sftpgate_common::{SftpgateConfig, SftpgateConfigStore};
use tracing::*;

const ENV_PREFIX: &str = "SFTPGATE";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load_store(path: &Path, environment: Environment) -> Result<SftpgateConfigStore> {
    Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(environment)
        .build()
        .context("Could not load config")?
        .try_deserialize()
        .context("Could not parse config")
}

/// Reads the YAML file at `path` (if present) and applies `SFTPGATE_*` overrides.
pub fn load_config(path: &Path, secure: bool) -> Result<SftpgateConfig> {
    let exists = path.exists();
    if secure && exists {
        secure_file(path).context("Could not secure config")?;
    }

    let store = load_store(path, environment())?;
    let config = SftpgateConfig { store };
    config.validate().context("Invalid config")?;

    if exists {
        info!("Using config: {path:?}");
    } else {
        info!("Config file {path:?} not found, using defaults");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use config::Map;
    use tempfile::NamedTempFile;

    use super::*;

    fn temp_yaml(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sftpgate.yaml");
        let store = load_store(&path, env(&[])).unwrap();
        assert_eq!(store.http.listen.port(), 3000);
        assert!(store.sftp.reject_parent_segments);
    }

    #[test]
    fn test_file_values() {
        let file = temp_yaml(
            "http:\n  listen: 127.0.0.1:8022\nsftp:\n  timeouts:\n    connect: 7s\n  security:\n    mac: [hmac-sha1]\n",
        );
        let store = load_store(file.path(), env(&[])).unwrap();

        assert_eq!(store.http.listen.port(), 8022);
        assert_eq!(store.sftp.timeouts.connect, Duration::from_secs(7));
        assert_eq!(store.sftp.security.mac, vec!["hmac-sha1".to_string()]);
        assert_eq!(store.sftp.security.kex.len(), 6);
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = temp_yaml("sftp:\n  timeouts:\n    connect: 7s\n");
        let store = load_store(
            file.path(),
            env(&[
                ("SFTPGATE_SFTP__TIMEOUTS__CONNECT", "9s"),
                ("SFTPGATE_SFTP__REJECT_PARENT_SEGMENTS", "false"),
                ("SFTPGATE_HTTP__TRUST_X_FORWARDED_HEADERS", "true"),
            ]),
        )
        .unwrap();

        assert_eq!(store.sftp.timeouts.connect, Duration::from_secs(9));
        assert!(!store.sftp.reject_parent_segments);
        assert!(store.http.trust_x_forwarded_headers);
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let file = temp_yaml("sftp:\n  security:\n    cipher: []\n");
        assert!(load_config(file.path(), false).is_err());
    }
}
