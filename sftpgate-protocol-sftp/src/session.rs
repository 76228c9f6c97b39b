use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use sftpgate_common::{SessionTimeouts, SftpConfig};
use tracing::*;

use crate::{
    DirectoryEntry, FileOperation, OperationOutput, ResultEnvelope, SessionFailure,
    SftpClientError, TransportConfig,
};

/// Opens authenticated sessions against a remote host.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        config: &TransportConfig,
    ) -> Result<Box<dyn RemoteSession>, SftpClientError>;
}

/// One connected remote file system handle.
#[async_trait]
pub trait RemoteSession: Send {
    async fn list(&mut self, path: &str) -> Result<Vec<DirectoryEntry>, SftpClientError>;
    async fn get(&mut self, path: &str) -> Result<Bytes, SftpClientError>;
    async fn put(&mut self, content: Bytes, path: &str) -> Result<(), SftpClientError>;
    async fn delete(&mut self, path: &str) -> Result<(), SftpClientError>;
    async fn close(self: Box<Self>) -> Result<(), SftpClientError>;
}

async fn bounded<T, F>(stage: &'static str, after: Duration, fut: F) -> Result<T, SftpClientError>
where
    F: Future<Output = Result<T, SftpClientError>>,
{
    tokio::time::timeout(after, fut)
        .await
        .unwrap_or(Err(SftpClientError::Timeout { stage, after }))
}

/// Drives connect → one operation → close for a single request.
///
/// Sessions are never shared or reused. Whatever the operation does, a
/// session that was opened is closed before `execute` returns, and every
/// failure ends up in the returned envelope.
pub struct SessionController {
    connector: Arc<dyn Connector>,
    timeouts: SessionTimeouts,
    reject_parent_segments: bool,
}

impl SessionController {
    pub fn new(connector: Arc<dyn Connector>, config: &SftpConfig) -> Self {
        Self {
            connector,
            timeouts: config.timeouts,
            reject_parent_segments: config.reject_parent_segments,
        }
    }

    pub async fn execute(
        &self,
        config: TransportConfig,
        operation: FileOperation,
    ) -> ResultEnvelope {
        let kind = operation.kind();
        let outcome = self.run(config, operation).await;
        ResultEnvelope::from_outcome(kind, outcome)
    }

    async fn run(
        &self,
        config: TransportConfig,
        operation: FileOperation,
    ) -> Result<OperationOutput, SessionFailure> {
        let sink = config.diagnostics().clone();
        let session_id = sink.session();

        if self.reject_parent_segments {
            operation.reject_parent_segments().map_err(|error| {
                warn!(session=%session_id, %error, "Rejected request path");
                SessionFailure::validation(error)
            })?;
        }

        sink.emit(format_args!(
            "Connecting to {} as {:?}",
            config.address(),
            config.username()
        ));
        let session = bounded(
            "connect",
            self.timeouts.connect,
            self.connector.connect(&config),
        )
        .await
        .map_err(|error| {
            warn!(session=%session_id, host=%config.host(), %error, "Connection failed");
            SessionFailure::connect(error)
        })?;
        drop(config);

        self.operate_and_close(session, operation, &session_id)
            .await
            .map_err(SessionFailure::operation)
    }

    async fn operate_and_close(
        &self,
        mut session: Box<dyn RemoteSession>,
        operation: FileOperation,
        session_id: &uuid::Uuid,
    ) -> Result<OperationOutput, SftpClientError> {
        let kind = operation.kind();
        let result = bounded(
            "operation",
            self.timeouts.operation,
            operation.run(&mut *session),
        )
        .await;

        match &result {
            Ok(_) => debug!(session=%session_id, ?kind, "Operation completed"),
            Err(error) => info!(
                session=%session_id,
                ?kind,
                code=error.remote_code(),
                %error,
                "Operation failed"
            ),
        }

        if let Err(error) = bounded("close", self.timeouts.close, session.close()).await {
            warn!(session=%session_id, %error, "Failed to close session");
        }

        result
    }
}
