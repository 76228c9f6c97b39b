use poem::web::Data;
use poem::Request;
use poem_openapi::OpenApi;
use sftpgate_protocol_sftp::FileOperation;

use crate::common::{connection_request, execute, header_value, EnvelopeResponse, Services};

pub struct Api;

#[OpenApi]
impl Api {
    /// Headers: `FilePath`, `SftpHost`, `UserName`, `Password`.
    #[oai(path = "/deleteFile", method = "post", operation_id = "delete_file")]
    async fn api_delete_file(
        &self,
        req: &Request,
        services: Data<&Services>,
    ) -> poem::Result<EnvelopeResponse> {
        let operation = FileOperation::Delete {
            path: header_value(req, "FilePath"),
        };
        Ok(execute(&services, connection_request(req), operation).await)
    }
}
