pub mod api;
mod common;
pub mod logging;

use std::fmt::Debug;
use std::net::SocketAddr;

use anyhow::{Context, Result};
pub use common::{EnvelopeResponse, Services};
use poem::listener::TcpListener;
use poem::{handler, Endpoint, EndpointExt, Route, Server};
use poem_openapi::OpenApiService;
use tracing::*;

/// Mount point of the file API.
pub const API_PREFIX: &str = "/api/sftpclient";

#[handler]
fn health() -> String {
    format!("sftpgate {}", env!("CARGO_PKG_VERSION"))
}

pub fn build_app(services: Services) -> impl Endpoint {
    let api_service = OpenApiService::new(api::get(), "sftpgate", env!("CARGO_PKG_VERSION"))
        .server(API_PREFIX);

    Route::new()
        .nest(API_PREFIX, api_service)
        .at("/", poem::get(health))
        .around(logging::log_request)
        .data(services)
}

#[derive(Clone)]
pub struct HTTPProtocolServer {
    services: Services,
}

impl HTTPProtocolServer {
    pub fn new(services: &Services) -> Self {
        HTTPProtocolServer {
            services: services.clone(),
        }
    }

    pub async fn run(self, address: SocketAddr) -> Result<()> {
        let app = build_app(self.services);

        info!(?address, "Listening");
        Server::new(TcpListener::bind(address))
            .run(app)
            .await
            .context("Failed to start HTTP server")
    }
}

impl Debug for HTTPProtocolServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTPProtocolServer")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use poem::http::HeaderValue;
    use poem::test::TestClient;
    use sftpgate_common::{SftpgateConfig, SftpgateConfigStore};
    use sftpgate_protocol_sftp::testing::MemoryConnector;
    use sftpgate_protocol_sftp::{ResultEnvelope, FILE_CREATED_MESSAGE, FILE_DELETED_MESSAGE};

    use super::*;

    fn client(connector: &MemoryConnector) -> TestClient<impl Endpoint> {
        let services = Services::new(
            SftpgateConfig {
                store: SftpgateConfigStore::default(),
            },
            Arc::new(connector.clone()),
        );
        TestClient::new(build_app(services))
    }

    async fn envelope(resp: poem::test::TestResponse) -> ResultEnvelope {
        resp.assert_status_is_ok();
        resp.0.into_body().into_json().await.unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let resp = client(&MemoryConnector::new()).get("/").send().await;
        resp.assert_status_is_ok();
        resp.assert_text(format!("sftpgate {}", env!("CARGO_PKG_VERSION")))
            .await;
    }

    #[tokio::test]
    async fn test_list_reads_headers() {
        let connector = MemoryConnector::new()
            .with_credentials("alice", "pw")
            .with_file("/home/alice/a.txt", "A")
            .with_file("/home/alice/b.txt", "BB");
        let resp = client(&connector)
            .get("/api/sftpclient/getFilesList")
            .header("RequestPath", "/home/alice")
            .header("SftpHost", "sftp.local")
            .header("UserName", "alice")
            .header("Password", "pw")
            .send()
            .await;

        let envelope = envelope(resp).await;
        assert_eq!(envelope.status, "Success");
        let names: Vec<_> = envelope.file_list.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_wire_shape_is_camel_case() {
        let connector = MemoryConnector::new().with_file("/d/a.txt", "A");
        let resp = client(&connector)
            .get("/api/sftpclient/getFilesList")
            .header("RequestPath", "/d")
            .send()
            .await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let object = json.value().object();
        object.get("status").assert_string("Success");
        object.get("fileContent").assert_string("");
        object.get("errorMessage").assert_string("");
        object.get("message").assert_string("");
        let entry = object.get("fileList").array().get(0).object();
        entry.get("type").assert_string("-");
        entry.get("name").assert_string("a.txt");
        entry.get("rights").object().get("user").assert_string("rw");
    }

    #[tokio::test]
    async fn test_missing_headers_still_answer_200() {
        let connector = MemoryConnector::new().with_credentials("alice", "pw");
        let rejected = "All configured authentication methods failed";

        let list = envelope(
            client(&connector)
                .get("/api/sftpclient/getFilesList")
                .send()
                .await,
        )
        .await;
        assert_eq!(list.status, "Error");
        assert_eq!(list.error_message, rejected);
        assert_eq!(list.message, "");

        let read = envelope(client(&connector).get("/api/sftpclient/getFile").send().await).await;
        assert_eq!(read.status, "Error");
        assert_eq!(read.error_message, rejected);
        assert_eq!(read.message, rejected);

        let create = envelope(
            client(&connector)
                .post("/api/sftpclient/createFile")
                .send()
                .await,
        )
        .await;
        assert_eq!(create.status, "Error");
        assert_eq!(create.message, rejected);

        let delete = envelope(
            client(&connector)
                .post("/api/sftpclient/deleteFile")
                .send()
                .await,
        )
        .await;
        assert_eq!(delete.status, "Error");
        assert_eq!(delete.error_message, rejected);
        assert_eq!(connector.operations(), 0);
    }

    #[tokio::test]
    async fn test_create_without_content_type() {
        let connector = MemoryConnector::new().with_directory("/upload");
        let resp = client(&connector)
            .post("/api/sftpclient/createFile")
            .header("RemotePath", "/upload/raw.txt")
            .body("plain bytes")
            .send()
            .await;
        assert_eq!(envelope(resp).await.status, "Success");
        assert_eq!(
            connector.file("/upload/raw.txt").as_deref(),
            Some(&b"plain bytes"[..])
        );
    }

    #[tokio::test]
    async fn test_create_without_body_writes_empty_file() {
        let connector = MemoryConnector::new().with_directory("/upload");
        let resp = client(&connector)
            .post("/api/sftpclient/createFile")
            .header("RemotePath", "/upload/empty.txt")
            .send()
            .await;
        assert_eq!(envelope(resp).await.message, FILE_CREATED_MESSAGE);
        assert_eq!(connector.file("/upload/empty.txt").as_deref(), Some(&b""[..]));
    }

    #[tokio::test]
    async fn test_non_utf8_header_is_decoded_lossily() {
        let connector = MemoryConnector::new().with_directory("/upload");
        let resp = client(&connector)
            .post("/api/sftpclient/createFile")
            .header(
                "RemotePath",
                HeaderValue::from_bytes(b"/upload/caf\xe9.txt").unwrap(),
            )
            .body("x")
            .send()
            .await;
        assert_eq!(envelope(resp).await.status, "Success");
        assert!(connector.file("/upload/caf\u{FFFD}.txt").is_some());
    }

    #[tokio::test]
    async fn test_create_read_delete_flow() {
        let connector = MemoryConnector::new().with_directory("/upload");
        let client = client(&connector);

        let created = envelope(
            client
                .post("/api/sftpclient/createFile")
                .header("RemotePath", "/upload/notes.txt")
                .content_type("text/plain")
                .body("hello world")
                .send()
                .await,
        )
        .await;
        assert_eq!(created.status, "Success");
        assert_eq!(created.message, FILE_CREATED_MESSAGE);

        let read = envelope(
            client
                .get("/api/sftpclient/getFile")
                .header("RequestPath", "/upload")
                .header("FileName", "notes.txt")
                .send()
                .await,
        )
        .await;
        assert_eq!(read.status, "");
        assert_eq!(read.file_content, "hello world");

        let deleted = envelope(
            client
                .post("/api/sftpclient/deleteFile")
                .header("FilePath", "/upload/notes.txt")
                .send()
                .await,
        )
        .await;
        assert_eq!(deleted.message, FILE_DELETED_MESSAGE);
        assert!(connector.file("/upload/notes.txt").is_none());
        assert_eq!(connector.closes(), 3);
    }

    #[tokio::test]
    async fn test_create_accepts_binary_body() {
        let connector = MemoryConnector::new().with_directory("/bin");
        let resp = client(&connector)
            .post("/api/sftpclient/createFile")
            .header("RemotePath", "/bin/blob")
            .content_type("application/octet-stream")
            .body(vec![0u8, 159, 146, 150])
            .send()
            .await;
        assert_eq!(envelope(resp).await.status, "Success");
        assert_eq!(
            connector.file("/bin/blob").as_deref(),
            Some(&[0u8, 159, 146, 150][..])
        );
    }

    #[tokio::test]
    async fn test_read_failure_uses_message_field() {
        let connector = MemoryConnector::new().with_directory("/home/user");
        let resp = client(&connector)
            .get("/api/sftpclient/getFile")
            .header("RequestPath", "/home/user")
            .header("FileName", "missing.txt")
            .send()
            .await;
        let envelope = envelope(resp).await;
        assert_eq!(envelope.status, "Error");
        assert_eq!(envelope.message, "No such file");
        assert_eq!(envelope.error_message, "");
    }
}
