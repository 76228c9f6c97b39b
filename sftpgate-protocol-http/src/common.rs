use std::sync::Arc;

use poem::Request;
use poem_openapi::payload::Json;
use poem_openapi::ApiResponse;
use sftpgate_common::{Secret, SftpgateConfig};
use sftpgate_protocol_sftp::{
    ConnectionRequest, Connector, DiagnosticSink, FileOperation, ResultEnvelope,
    SessionController, TransportConfig,
};
use tracing::*;
use uuid::Uuid;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct Services {
    pub config: Arc<SftpgateConfig>,
    pub controller: Arc<SessionController>,
}

impl Services {
    pub fn new(config: SftpgateConfig, connector: Arc<dyn Connector>) -> Self {
        let controller = SessionController::new(connector, &config.store.sftp);
        Self {
            config: Arc::new(config),
            controller: Arc::new(controller),
        }
    }
}

#[derive(ApiResponse)]
pub enum EnvelopeResponse {
    #[oai(status = 200)]
    Ok(Json<ResultEnvelope>),
}

/// Reads a header as text. Absent headers are empty and invalid UTF-8 is
/// replaced rather than rejected, so a request always reaches the session.
pub fn header_value(req: &Request, name: &str) -> String {
    req.headers()
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default()
}

pub fn connection_request(req: &Request) -> ConnectionRequest {
    ConnectionRequest {
        host: header_value(req, "SftpHost"),
        username: header_value(req, "UserName"),
        password: Secret::new(header_value(req, "Password")),
    }
}

/// Runs one operation on a fresh session and wraps the envelope for the wire.
pub async fn execute(
    services: &Services,
    request: ConnectionRequest,
    operation: FileOperation,
) -> EnvelopeResponse {
    let session_id = Uuid::new_v4();
    let config = TransportConfig::negotiate(
        request,
        &services.config.store.sftp.security,
        DiagnosticSink::new(session_id),
    );

    let kind = operation.kind();
    let envelope = services
        .controller
        .execute(config, operation)
        .instrument(info_span!("SFTP", session=%session_id))
        .await;
    debug!(session=%session_id, ?kind, status=%envelope.status, "Session finished");

    EnvelopeResponse::Ok(Json(envelope))
}
