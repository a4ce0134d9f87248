mod client;
pub mod orchestrator;
mod types;

pub use client::BoardClient;
pub use orchestrator::{
    effective_title, Completion, FileBatch, MessagePost, Phase, SizeLimit, SubmitRejected,
    UploadOrchestrator,
};
pub use types::{
    BatchError, BatchOutcome, BatchReport, FileStatus, PostedEntry, UploadError, UploadStatus,
    WorkerEvent,
};
