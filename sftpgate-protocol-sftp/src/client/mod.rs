mod algorithms;
mod error;
mod handler;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use russh::client::Handle;
use russh_sftp::client::fs::DirEntry;
use russh_sftp::client::SftpSession;
use sftpgate_common::SftpConfig;
use tokio::io::AsyncWriteExt;
use tracing::*;

pub use self::algorithms::{select_algorithms, unsupported_algorithms, UnsupportedAlgorithm};
pub use self::error::SftpClientError;
use self::handler::ClientHandler;
use crate::{
    Connector, DiagnosticSink, DirectoryEntry, EntryKind, EntryRights, RemoteSession,
    TransportConfig,
};

/// Opens real SSH connections and starts the `sftp` subsystem on them.
pub struct RusshConnector {
    inactivity_timeout: Duration,
}

impl RusshConnector {
    pub fn new(config: &SftpConfig) -> Self {
        Self {
            inactivity_timeout: config.inactivity_timeout,
        }
    }
}

#[async_trait]
impl Connector for RusshConnector {
    async fn connect(
        &self,
        config: &TransportConfig,
    ) -> Result<Box<dyn RemoteSession>, SftpClientError> {
        let sink = config.diagnostics().clone();
        let preferred = select_algorithms(config)?;
        let ssh_config = Arc::new(russh::client::Config {
            preferred,
            inactivity_timeout: Some(self.inactivity_timeout),
            ..Default::default()
        });

        sink.emit(format_args!("Opening connection to {}", config.address()));
        let handler = ClientHandler { sink: sink.clone() };
        let mut handle =
            russh::client::connect(ssh_config, (config.host(), config.port()), handler).await?;
        sink.emit("Key exchange complete");

        let auth_result = handle
            .authenticate_password(config.username(), config.password().expose_secret().as_str())
            .await?;
        if !auth_result.success() {
            sink.emit(format_args!(
                "Password authentication rejected for {:?}",
                config.username()
            ));
            disconnect(&handle).await;
            return Err(SftpClientError::AuthRejected);
        }
        sink.emit("Authenticated");

        let sftp = match open_sftp(&mut handle).await {
            Ok(sftp) => sftp,
            Err(error) => {
                disconnect(&handle).await;
                return Err(error);
            }
        };
        sink.emit("SFTP subsystem ready");
        info!(address=%config.address(), session=%sink.session(), "Connected");

        Ok(Box::new(SftpRemoteSession { handle, sftp, sink }))
    }
}

async fn open_sftp(handle: &mut Handle<ClientHandler>) -> Result<SftpSession, SftpClientError> {
    let channel = handle.channel_open_session().await?;
    channel.request_subsystem(true, "sftp").await?;
    Ok(SftpSession::new(channel.into_stream()).await?)
}

async fn disconnect(handle: &Handle<ClientHandler>) {
    let _ = handle
        .disconnect(russh::Disconnect::ByApplication, "", "English")
        .await;
}

pub struct SftpRemoteSession {
    handle: Handle<ClientHandler>,
    sftp: SftpSession,
    sink: DiagnosticSink,
}

#[async_trait]
impl RemoteSession for SftpRemoteSession {
    async fn list(&mut self, path: &str) -> Result<Vec<DirectoryEntry>, SftpClientError> {
        let entries = self.sftp.read_dir(path).await?;
        Ok(entries
            .filter(|x| x.file_name() != "." && x.file_name() != "..")
            .map(directory_entry)
            .collect())
    }

    async fn get(&mut self, path: &str) -> Result<Bytes, SftpClientError> {
        Ok(Bytes::from(self.sftp.read(path).await?))
    }

    async fn put(&mut self, content: Bytes, path: &str) -> Result<(), SftpClientError> {
        let mut file = self.sftp.create(path).await?;
        file.write_all(&content).await?;
        file.shutdown().await?;
        Ok(())
    }

    async fn delete(&mut self, path: &str) -> Result<(), SftpClientError> {
        Ok(self.sftp.remove_file(path).await?)
    }

    async fn close(self: Box<Self>) -> Result<(), SftpClientError> {
        let Self { handle, sftp, sink } = *self;
        let sftp_result = sftp.close().await;
        disconnect(&handle).await;
        sink.emit("Connection closed");
        Ok(sftp_result?)
    }
}

fn millis(seconds: Option<u32>) -> u64 {
    u64::from(seconds.unwrap_or(0)) * 1000
}

fn directory_entry(entry: DirEntry) -> DirectoryEntry {
    let file_type = entry.file_type();
    let metadata = entry.metadata();
    let kind = if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_symlink() {
        EntryKind::Symlink
    } else {
        EntryKind::File
    };
    DirectoryEntry {
        kind,
        name: entry.file_name(),
        size: metadata.size.unwrap_or(0),
        modify_time: millis(metadata.mtime),
        access_time: millis(metadata.atime),
        rights: EntryRights::from_mode(metadata.permissions.unwrap_or(0)),
        owner: metadata.uid.unwrap_or(0),
        group: metadata.gid.unwrap_or(0),
    }
}
