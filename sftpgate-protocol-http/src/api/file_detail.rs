use poem::web::Data;
use poem::Request;
use poem_openapi::OpenApi;
use sftpgate_protocol_sftp::FileOperation;

use crate::common::{connection_request, execute, header_value, EnvelopeResponse, Services};

pub struct Api;

#[OpenApi]
impl Api {
    /// Headers: `RequestPath`, `FileName`, `SftpHost`, `UserName`, `Password`.
    #[oai(path = "/getFile", method = "get", operation_id = "get_file")]
    async fn api_get_file(
        &self,
        req: &Request,
        services: Data<&Services>,
    ) -> poem::Result<EnvelopeResponse> {
        let operation = FileOperation::Read {
            path: header_value(req, "RequestPath"),
            file_name: header_value(req, "FileName"),
        };
        Ok(execute(&services, connection_request(req), operation).await)
    }
}
