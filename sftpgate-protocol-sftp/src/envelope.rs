use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use tracing::*;

use crate::{DirectoryEntry, OperationKind, OperationOutput, SftpClientError};

pub const FILE_CREATED_MESSAGE: &str = "File created successfully";
pub const FILE_DELETED_MESSAGE: &str = "File deleted successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStatus {
    /// Read success leaves the status blank.
    Unset,
    Success,
    Error,
}

impl EnvelopeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Success => "Success",
            Self::Error => "Error",
        }
    }
}

/// Where in the request lifecycle a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Validation,
    Connect,
    Operation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFailure {
    pub stage: FailureStage,
    pub detail: String,
}

impl SessionFailure {
    pub fn new(stage: FailureStage, error: &SftpClientError) -> Self {
        Self {
            stage,
            detail: error.to_string(),
        }
    }

    pub fn validation(error: SftpClientError) -> Self {
        Self::new(FailureStage::Validation, &error)
    }

    pub fn connect(error: SftpClientError) -> Self {
        Self::new(FailureStage::Connect, &error)
    }

    pub fn operation(error: SftpClientError) -> Self {
        Self::new(FailureStage::Operation, &error)
    }
}

enum FailureField {
    Message,
    ErrorMessage,
    Both,
}

/// Read and write clients look at `message`, list and delete clients at
/// `errorMessage`. A failed connect is reported in `errorMessage` everywhere
/// and additionally in `message` where that is what the client reads.
fn failure_field(kind: OperationKind, stage: FailureStage) -> FailureField {
    match (kind, stage) {
        (OperationKind::List | OperationKind::Delete, _) => FailureField::ErrorMessage,
        (OperationKind::Read | OperationKind::Write, FailureStage::Connect) => FailureField::Both,
        (OperationKind::Read | OperationKind::Write, _) => FailureField::Message,
    }
}

/// The response body of every endpoint. All fields are always serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Object)]
#[serde(rename_all = "camelCase")]
#[oai(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub file_content: String,
    pub file_list: Vec<DirectoryEntry>,
    pub status: String,
    pub error_message: String,
    pub message: String,
}

impl ResultEnvelope {
    pub fn from_outcome(
        kind: OperationKind,
        outcome: Result<OperationOutput, SessionFailure>,
    ) -> Self {
        let mut envelope = Self::default();
        match outcome {
            Ok(output) => {
                if output.kind() != kind {
                    warn!(?kind, output = ?output.kind(), "Operation produced unexpected output");
                }
                match output {
                    OperationOutput::Listing(entries) => {
                        envelope.file_list = entries;
                        envelope.set_status(EnvelopeStatus::Success);
                    }
                    OperationOutput::Content(content) => {
                        envelope.file_content = content;
                        envelope.set_status(EnvelopeStatus::Unset);
                    }
                    OperationOutput::Written => {
                        envelope.message = FILE_CREATED_MESSAGE.to_owned();
                        envelope.set_status(EnvelopeStatus::Success);
                    }
                    OperationOutput::Deleted => {
                        envelope.message = FILE_DELETED_MESSAGE.to_owned();
                        envelope.set_status(EnvelopeStatus::Success);
                    }
                }
            }
            Err(failure) => {
                match failure_field(kind, failure.stage) {
                    FailureField::Message => envelope.message = failure.detail,
                    FailureField::ErrorMessage => envelope.error_message = failure.detail,
                    FailureField::Both => {
                        envelope.message = failure.detail.clone();
                        envelope.error_message = failure.detail;
                    }
                }
                envelope.set_status(EnvelopeStatus::Error);
            }
        }
        envelope
    }

    fn set_status(&mut self, status: EnvelopeStatus) {
        self.status = status.as_str().to_owned();
    }

    pub fn is_error(&self) -> bool {
        self.status == EnvelopeStatus::Error.as_str()
    }
}
