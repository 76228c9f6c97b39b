mod defaults;
mod security;

use std::time::Duration;

use defaults::*;
use schemars::JsonSchema;
pub use security::SecurityPolicy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{ListenEndpoint, SftpgateError};

/// Remote SFTP servers are always reached on the standard SSH port.
pub const SFTP_PORT: u16 = 22;

#[derive(Debug, Deserialize, Serialize, Clone, JsonSchema)]
pub struct HttpConfig {
    #[serde(default = "_default_http_listen")]
    #[schemars(with = "String")]
    pub listen: ListenEndpoint,

    #[serde(default = "_default_false")]
    pub trust_x_forwarded_headers: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            listen: _default_http_listen(),
            trust_x_forwarded_headers: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub struct SessionTimeouts {
    #[serde(default = "_default_connect_timeout", with = "humantime_serde")]
    #[schemars(with = "String")]
    pub connect: Duration,

    #[serde(default = "_default_operation_timeout", with = "humantime_serde")]
    #[schemars(with = "String")]
    pub operation: Duration,

    #[serde(default = "_default_close_timeout", with = "humantime_serde")]
    #[schemars(with = "String")]
    pub close: Duration,
}

impl Default for SessionTimeouts {
    fn default() -> Self {
        Self {
            connect: _default_connect_timeout(),
            operation: _default_operation_timeout(),
            close: _default_close_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, JsonSchema)]
pub struct SftpConfig {
    #[serde(default)]
    pub security: SecurityPolicy,

    #[serde(default)]
    pub timeouts: SessionTimeouts,

    #[serde(default = "_default_inactivity_timeout", with = "humantime_serde")]
    #[schemars(with = "String")]
    pub inactivity_timeout: Duration,

    /// Refuse paths with a `..` component before connecting.
    #[serde(default = "_default_true")]
    pub reject_parent_segments: bool,
}

impl Default for SftpConfig {
    fn default() -> Self {
        Self {
            security: <_>::default(),
            timeouts: <_>::default(),
            inactivity_timeout: _default_inactivity_timeout(),
            reject_parent_segments: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, JsonSchema)]
pub struct SftpgateConfigStore {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub sftp: SftpConfig,
}

#[derive(Debug, Clone)]
pub struct SftpgateConfig {
    pub store: SftpgateConfigStore,
}

impl SftpgateConfig {
    pub fn validate(&self) -> Result<(), SftpgateError> {
        self.store.sftp.security.validate()?;

        let timeouts = &self.store.sftp.timeouts;
        for (name, value) in [
            ("connect", timeouts.connect),
            ("operation", timeouts.operation),
            ("close", timeouts.close),
        ] {
            if value.is_zero() {
                return Err(SftpgateError::ZeroTimeout(name));
            }
        }

        if !self.store.sftp.reject_parent_segments {
            warn!("`sftp.reject_parent_segments` is disabled - request paths may contain `..`");
        }
        Ok(())
    }
}
