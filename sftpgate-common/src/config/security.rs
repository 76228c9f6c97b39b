use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults::*;
use crate::SftpgateError;

/// Algorithms offered to the remote server during key exchange, in order of preference.
///
/// The defaults favour interoperability with legacy servers over a strict
/// security posture and include SHA-1 key exchange and `3des-cbc`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct SecurityPolicy {
    #[serde(default = "_default_kex_algorithms")]
    pub kex: Vec<String>,

    #[serde(default = "_default_cipher_algorithms")]
    pub cipher: Vec<String>,

    #[serde(default = "_default_host_key_algorithms")]
    pub host_key: Vec<String>,

    #[serde(default = "_default_mac_algorithms")]
    pub mac: Vec<String>,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            kex: _default_kex_algorithms(),
            cipher: _default_cipher_algorithms(),
            host_key: _default_host_key_algorithms(),
            mac: _default_mac_algorithms(),
        }
    }
}

impl SecurityPolicy {
    pub fn validate(&self) -> Result<(), SftpgateError> {
        for (category, list) in [
            ("key exchange", &self.kex),
            ("cipher", &self.cipher),
            ("host key", &self.host_key),
            ("MAC", &self.mac),
        ] {
            if list.iter().all(|x| x.trim().is_empty()) {
                return Err(SftpgateError::EmptyAlgorithmList(category));
            }
        }
        Ok(())
    }
}
