use std::error::Error;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum SftpClientError {
    #[error("russh error: {0}")]
    Russh(#[from] russh::Error),
    #[error("{message}")]
    Remote { code: String, message: String },
    #[error("sftp error: {0}")]
    Sftp(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("All configured authentication methods failed")]
    AuthRejected,
    #[error("no supported {0} algorithms in the security policy")]
    NoSupportedAlgorithms(&'static str),
    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: &'static str, after: Duration },
    #[error("path {0:?} contains a parent directory segment")]
    ParentSegment(String),
    #[error(transparent)]
    Other(Box<dyn Error + Send + Sync>),
}

impl SftpClientError {
    pub fn remote<C: Into<String>, M: Into<String>>(code: C, message: M) -> Self {
        let code = code.into();
        let message = message.into();
        Self::Remote {
            message: if message.is_empty() {
                code.clone()
            } else {
                message
            },
            code,
        }
    }

    /// SFTP status code of a failure reported by the server.
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<russh_sftp::client::error::Error> for SftpClientError {
    fn from(error: russh_sftp::client::error::Error) -> Self {
        match error {
            russh_sftp::client::error::Error::Status(status) => {
                Self::remote(format!("{:?}", status.status_code), status.error_message)
            }
            other => Self::Sftp(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_falls_back_to_code() {
        let error = SftpClientError::remote("PermissionDenied", "");
        assert_eq!(error.to_string(), "PermissionDenied");
        assert_eq!(error.remote_code(), Some("PermissionDenied"));

        let error = SftpClientError::remote("NoSuchFile", "No such file");
        assert_eq!(error.to_string(), "No such file");
        assert_eq!(error.remote_code(), Some("NoSuchFile"));
        assert_eq!(SftpClientError::AuthRejected.remote_code(), None);
    }
}
