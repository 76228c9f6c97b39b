//! In-memory stand-in for a remote SFTP server.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    Connector, DirectoryEntry, EntryKind, EntryRights, RemoteSession, SftpClientError,
    TransportConfig,
};

const NO_SUCH_FILE: &str = "No such file";

#[derive(Default)]
struct MemoryState {
    files: BTreeMap<String, Bytes>,
    directories: BTreeSet<String>,
    credentials: Option<(String, String)>,
    connect_error: Option<String>,
    operation_error: Option<String>,
    close_error: Option<String>,
    stall_connect: bool,
    stall_operations: bool,
    stall_close: bool,
    connects: usize,
    operations: usize,
    closes: usize,
}

impl MemoryState {
    fn is_directory(&self, path: &str) -> bool {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        self.directories.contains(path) || self.files.keys().any(|x| x.starts_with(&prefix))
    }
}

/// A [Connector] backed by a shared in-memory file system.
///
/// Clones share state, so a test can keep one handle for assertions and
/// hand another to the code under test.
#[derive(Clone, Default)]
pub struct MemoryConnector {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_file<C: Into<Bytes>>(self, path: &str, content: C) -> Self {
        self.state().files.insert(path.to_owned(), content.into());
        self
    }

    pub fn with_directory(self, path: &str) -> Self {
        self.state().directories.insert(path.to_owned());
        self
    }

    /// Only accept this username/password pair.
    pub fn with_credentials(self, username: &str, password: &str) -> Self {
        self.state().credentials = Some((username.to_owned(), password.to_owned()));
        self
    }

    pub fn fail_connect(self, message: &str) -> Self {
        self.state().connect_error = Some(message.to_owned());
        self
    }

    pub fn fail_operations(self, message: &str) -> Self {
        self.state().operation_error = Some(message.to_owned());
        self
    }

    pub fn fail_close(self, message: &str) -> Self {
        self.state().close_error = Some(message.to_owned());
        self
    }

    pub fn stall_connect(self) -> Self {
        self.state().stall_connect = true;
        self
    }

    pub fn stall_operations(self) -> Self {
        self.state().stall_operations = true;
        self
    }

    pub fn stall_close(self) -> Self {
        self.state().stall_close = true;
        self
    }

    pub fn connects(&self) -> usize {
        self.state().connects
    }

    pub fn operations(&self) -> usize {
        self.state().operations
    }

    pub fn closes(&self) -> usize {
        self.state().closes
    }

    pub fn file(&self, path: &str) -> Option<Bytes> {
        self.state().files.get(path).cloned()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(
        &self,
        config: &TransportConfig,
    ) -> Result<Box<dyn RemoteSession>, SftpClientError> {
        let stall = {
            let mut state = self.state();
            state.connects += 1;
            if let Some(ref message) = state.connect_error {
                return Err(SftpClientError::Other(message.clone().into()));
            }
            if let Some((ref username, ref password)) = state.credentials {
                if config.username() != username.as_str()
                    || config.password().expose_secret() != password
                {
                    return Err(SftpClientError::AuthRejected);
                }
            }
            state.stall_connect
        };
        if stall {
            futures::future::pending::<()>().await;
        }
        config.diagnostics().emit("Connected to in-memory server");
        Ok(Box::new(MemorySession {
            state: self.state.clone(),
        }))
    }
}

struct MemorySession {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySession {
    async fn begin(&self) -> Result<MutexGuard<'_, MemoryState>, SftpClientError> {
        let stall = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.operations += 1;
            if let Some(ref message) = state.operation_error {
                return Err(SftpClientError::remote("Failure", message.clone()));
            }
            state.stall_operations
        };
        if stall {
            futures::future::pending::<()>().await;
        }
        Ok(self.state.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

fn no_such_file() -> SftpClientError {
    SftpClientError::remote("NoSuchFile", NO_SUCH_FILE)
}

#[async_trait]
impl RemoteSession for MemorySession {
    async fn list(&mut self, path: &str) -> Result<Vec<DirectoryEntry>, SftpClientError> {
        let state = self.begin().await?;
        if !state.is_directory(path) {
            return Err(no_such_file());
        }
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let mut entries = vec![];
        let mut seen_dirs = BTreeSet::new();
        for (file, content) in state.files.iter() {
            let Some(rest) = file.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                None => entries.push(entry(EntryKind::File, rest, content.len() as u64)),
                Some((dir, _)) => {
                    if seen_dirs.insert(dir.to_owned()) {
                        entries.push(entry(EntryKind::Directory, dir, 0));
                    }
                }
            }
        }
        Ok(entries)
    }

    async fn get(&mut self, path: &str) -> Result<Bytes, SftpClientError> {
        let state = self.begin().await?;
        state.files.get(path).cloned().ok_or_else(no_such_file)
    }

    async fn put(&mut self, content: Bytes, path: &str) -> Result<(), SftpClientError> {
        let mut state = self.begin().await?;
        let parent = path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        if !parent.is_empty() && !state.is_directory(parent) {
            return Err(no_such_file());
        }
        state.files.insert(path.to_owned(), content);
        Ok(())
    }

    async fn delete(&mut self, path: &str) -> Result<(), SftpClientError> {
        let mut state = self.begin().await?;
        state.files.remove(path).map(|_| ()).ok_or_else(no_such_file)
    }

    async fn close(self: Box<Self>) -> Result<(), SftpClientError> {
        let stall = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.closes += 1;
            if let Some(ref message) = state.close_error {
                return Err(SftpClientError::Other(message.clone().into()));
            }
            state.stall_close
        };
        if stall {
            futures::future::pending::<()>().await;
        }
        Ok(())
    }
}

fn entry(kind: EntryKind, name: &str, size: u64) -> DirectoryEntry {
    DirectoryEntry {
        kind,
        name: name.to_owned(),
        size,
        modify_time: 0,
        access_time: 0,
        rights: EntryRights::from_mode(match kind {
            EntryKind::Directory => 0o755,
            _ => 0o644,
        }),
        owner: 1000,
        group: 1000,
    }
}
