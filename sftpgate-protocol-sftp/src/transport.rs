use sftpgate_common::{Secret, SecurityPolicy, SFTP_PORT};

use crate::DiagnosticSink;

/// Caller-supplied connection identity, taken verbatim from the request.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRequest {
    pub host: String,
    pub username: String,
    pub password: Secret<String>,
}

/// Everything needed to open one session. Built fresh for every request.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    host: String,
    username: String,
    password: Secret<String>,
    port: u16,
    kex: Vec<String>,
    cipher: Vec<String>,
    host_key: Vec<String>,
    mac: Vec<String>,
    diagnostics: DiagnosticSink,
}

impl TransportConfig {
    /// Pairs the request identity with the algorithm allow-list.
    ///
    /// Credentials are not validated here: empty or missing values surface
    /// later as connection or authentication failures.
    pub fn negotiate(
        request: ConnectionRequest,
        policy: &SecurityPolicy,
        diagnostics: DiagnosticSink,
    ) -> Self {
        Self {
            host: request.host,
            username: request.username,
            password: request.password,
            port: SFTP_PORT,
            kex: policy.kex.clone(),
            cipher: policy.cipher.clone(),
            host_key: policy.host_key.clone(),
            mac: policy.mac.clone(),
            diagnostics,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &Secret<String> {
        &self.password
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn kex(&self) -> &[String] {
        &self.kex
    }

    pub fn cipher(&self) -> &[String] {
        &self.cipher
    }

    pub fn host_key(&self) -> &[String] {
        &self.host_key
    }

    pub fn mac(&self) -> &[String] {
        &self.mac
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_negotiate_copies_policy_and_fixes_port() {
        let policy = SecurityPolicy::default();
        let config = TransportConfig::negotiate(
            ConnectionRequest {
                host: "sftp.example.com".into(),
                username: "alice".into(),
                password: Secret::new("pw".into()),
            },
            &policy,
            DiagnosticSink::new(Uuid::new_v4()),
        );
        assert_eq!(config.port(), 22);
        assert_eq!(config.address(), "sftp.example.com:22");
        assert_eq!(config.kex(), policy.kex.as_slice());
        assert_eq!(config.cipher(), policy.cipher.as_slice());
        assert_eq!(config.host_key(), policy.host_key.as_slice());
        assert_eq!(config.mac(), policy.mac.as_slice());
        assert_eq!(config.password().expose_secret(), "pw");
    }

    #[test]
    fn test_empty_credentials_pass_through() {
        let config = TransportConfig::negotiate(
            ConnectionRequest::default(),
            &SecurityPolicy::default(),
            DiagnosticSink::new(Uuid::new_v4()),
        );
        assert_eq!(config.host(), "");
        assert_eq!(config.username(), "");
        assert_eq!(config.password().expose_secret(), "");
    }

    #[test]
    fn test_password_not_in_debug_output() {
        let config = TransportConfig::negotiate(
            ConnectionRequest {
                host: "h".into(),
                username: "u".into(),
                password: Secret::new("topsecret".into()),
            },
            &SecurityPolicy::default(),
            DiagnosticSink::new(Uuid::new_v4()),
        );
        assert!(!format!("{config:?}").contains("topsecret"));
    }
}
