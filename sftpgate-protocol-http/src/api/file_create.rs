use poem::web::Data;
use poem::{Body, Request};
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;
use sftpgate_protocol_sftp::{
    FileOperation, OperationKind, ResultEnvelope, SessionFailure, SftpClientError,
};
use tracing::*;

use crate::common::{connection_request, execute, header_value, EnvelopeResponse, Services};

pub struct Api;

#[OpenApi]
impl Api {
    /// Headers: `RemotePath`, `SftpHost`, `UserName`, `Password`.
    ///
    /// The body is stored byte for byte whatever its content type. A missing
    /// body creates an empty file.
    #[oai(path = "/createFile", method = "post", operation_id = "create_file")]
    async fn api_create_file(
        &self,
        req: &Request,
        services: Data<&Services>,
        body: Body,
    ) -> poem::Result<EnvelopeResponse> {
        let content = match body.into_bytes().await {
            Ok(content) => content,
            Err(error) => {
                warn!(%error, "Could not read request body");
                let failure = SessionFailure::validation(SftpClientError::Other(Box::new(error)));
                return Ok(EnvelopeResponse::Ok(Json(ResultEnvelope::from_outcome(
                    OperationKind::Write,
                    Err(failure),
                ))));
            }
        };

        let operation = FileOperation::Write {
            remote_path: header_value(req, "RemotePath"),
            content,
        };
        Ok(execute(&services, connection_request(req), operation).await)
    }
}
