use bytes::Bytes;

use crate::{DirectoryEntry, RemoteSession, SftpClientError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    List,
    Read,
    Write,
    Delete,
}

/// The single remote call performed during a session.
#[derive(Debug, Clone)]
pub enum FileOperation {
    List { path: String },
    Read { path: String, file_name: String },
    Write { remote_path: String, content: Bytes },
    Delete { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutput {
    Listing(Vec<DirectoryEntry>),
    Content(String),
    Written,
    Deleted,
}

impl OperationOutput {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Listing(_) => OperationKind::List,
            Self::Content(_) => OperationKind::Read,
            Self::Written => OperationKind::Write,
            Self::Deleted => OperationKind::Delete,
        }
    }
}

impl FileOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::List { .. } => OperationKind::List,
            Self::Read { .. } => OperationKind::Read,
            Self::Write { .. } => OperationKind::Write,
            Self::Delete { .. } => OperationKind::Delete,
        }
    }

    /// The path the remote call will be made against.
    pub fn remote_path(&self) -> String {
        match self {
            Self::List { path } | Self::Delete { path } => path.clone(),
            Self::Read { path, file_name } => format!("{path}/{file_name}"),
            Self::Write { remote_path, .. } => remote_path.clone(),
        }
    }

    pub fn reject_parent_segments(&self) -> Result<(), SftpClientError> {
        let path = self.remote_path();
        if path.split(['/', '\\']).any(|segment| segment == "..") {
            return Err(SftpClientError::ParentSegment(path));
        }
        Ok(())
    }

    pub async fn run(
        self,
        session: &mut dyn RemoteSession,
    ) -> Result<OperationOutput, SftpClientError> {
        let remote_path = self.remote_path();
        match self {
            Self::List { .. } => session.list(&remote_path).await.map(OperationOutput::Listing),
            Self::Read { .. } => {
                let content = session.get(&remote_path).await?;
                Ok(OperationOutput::Content(
                    String::from_utf8_lossy(&content).into_owned(),
                ))
            }
            Self::Write { content, .. } => {
                session.put(content, &remote_path).await?;
                Ok(OperationOutput::Written)
            }
            Self::Delete { .. } => {
                session.delete(&remote_path).await?;
                Ok(OperationOutput::Deleted)
            }
        }
    }
}
