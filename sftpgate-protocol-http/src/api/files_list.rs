use poem::web::Data;
use poem::Request;
use poem_openapi::OpenApi;
use sftpgate_protocol_sftp::FileOperation;

use crate::common::{connection_request, execute, header_value, EnvelopeResponse, Services};

pub struct Api;

#[OpenApi]
impl Api {
    /// Headers: `RequestPath`, `SftpHost`, `UserName`, `Password`.
    #[oai(path = "/getFilesList", method = "get", operation_id = "get_files_list")]
    async fn api_get_files_list(
        &self,
        req: &Request,
        services: Data<&Services>,
    ) -> poem::Result<EnvelopeResponse> {
        let operation = FileOperation::List {
            path: header_value(req, "RequestPath"),
        };
        Ok(execute(&services, connection_request(req), operation).await)
    }
}
