use crate::board::PostKind;
use crate::selection::PendingFile;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Processing,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub index: usize,
    pub name: String,
    pub status: UploadStatus,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unreadable response ({0})")]
    Decode(String),
    #[error("{0}")]
    Server(String),
    #[error("upload interrupted: {0}")]
    Interrupted(String),
}

/// Failure that escaped the per-file loop; the batch is abandoned as a whole.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("unexpected upload failure: {0}")]
    Unexpected(String),
}

/// A post the server accepted, echoed onto the local board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedEntry {
    pub title: String,
    pub body: String,
    pub kind: PostKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    AllSucceeded,
    PartialSuccess,
    AllFailed,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub success_count: usize,
    pub error_count: usize,
    pub posted: Vec<PostedEntry>,
    /// Files the server accepted, in upload order.
    pub uploaded: Vec<PendingFile>,
}

impl BatchReport {
    pub fn outcome(&self) -> BatchOutcome {
        match (self.success_count, self.error_count) {
            (s, 0) if s > 0 => BatchOutcome::AllSucceeded,
            (s, _) if s > 0 => BatchOutcome::PartialSuccess,
            _ => BatchOutcome::AllFailed,
        }
    }
}

/// Messages from the upload worker thread to the UI thread.
#[derive(Debug)]
pub enum WorkerEvent {
    File(FileStatus),
    BatchDone(Result<BatchReport, BatchError>),
    MessageDone(Result<PostedEntry, UploadError>),
}
