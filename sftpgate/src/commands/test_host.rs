use std::sync::Arc;

use anyhow::Result;
use dialoguer::Password;
use sftpgate_common::{Secret, SftpgateConfig};
use sftpgate_protocol_sftp::{
    ConnectionRequest, Connector, DiagnosticSink, FileOperation, ResultEnvelope, RusshConnector,
    SessionController, TransportConfig,
};
use tracing::*;
use uuid::Uuid;

use crate::config::load_config;

pub(crate) async fn command(
    cli: &crate::Cli,
    host: &str,
    username: &str,
    path: &str,
) -> Result<()> {
    let config = load_config(&cli.config, true)?;

    let password = Password::new()
        .with_prompt(format!("Password for {username}@{host}"))
        .allow_empty_password(true)
        .interact()?;

    let connector = Arc::new(RusshConnector::new(&config.store.sftp));
    let envelope = list(
        &config,
        connector,
        ConnectionRequest {
            host: host.to_owned(),
            username: username.to_owned(),
            password: Secret::new(password),
        },
        path,
    )
    .await;

    if envelope.is_error() {
        error!(error = %envelope.error_message, "Listing failed");
        anyhow::bail!("Connection test failed")
    }

    for entry in &envelope.file_list {
        info!("{:?} {:>10} {}", entry.kind, entry.size, entry.name);
    }
    info!("Connection successful!");
    Ok(())
}

async fn list(
    config: &SftpgateConfig,
    connector: Arc<dyn Connector>,
    request: ConnectionRequest,
    path: &str,
) -> ResultEnvelope {
    let controller = SessionController::new(connector, &config.store.sftp);
    let transport = TransportConfig::negotiate(
        request,
        &config.store.sftp.security,
        DiagnosticSink::new(Uuid::new_v4()),
    );
    controller
        .execute(
            transport,
            FileOperation::List {
                path: path.to_owned(),
            },
        )
        .await
}
