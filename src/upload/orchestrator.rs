//! Idle/InProgress gate around file batches and message posts.
//!
//! `begin_*` checks preconditions synchronously and flips the phase to
//! InProgress; the returned job runs off the UI thread. `complete_*` must be
//! called exactly once per started job, whatever happened to it, and always
//! returns the orchestrator to Idle.

use crate::board::PostKind;
use crate::config::{BoardConfig, PartialSuccessPolicy};
use crate::notify::Notification;
use crate::selection::{AddOutcome, FileRef, PendingFile, SelectionStore};
use crate::upload::client::BoardClient;
use crate::upload::types::{
    BatchError, BatchOutcome, BatchReport, FileStatus, PostedEntry, UploadError, UploadStatus,
    WorkerEvent,
};
use crate::utils::file_size::FileSizeUtils;
use crate::utils::text::join_names;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    InProgress,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("Please select at least one file to upload.")]
    NothingSelected,
    #[error("An upload is in progress. Please try again shortly.")]
    AlreadyInProgress,
    #[error("Please enter a title.")]
    MissingTitle,
    #[error("Please enter some content.")]
    MissingContent,
}

impl SubmitRejected {
    pub fn notification(&self) -> Notification {
        match self {
            SubmitRejected::AlreadyInProgress => Notification::info(self.to_string()),
            _ => Notification::error(self.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeLimit {
    pub bytes: u64,
    pub text: String,
}

/// What the UI should do once a job has settled.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Completion {
    pub notifications: Vec<Notification>,
    pub clear_form: bool,
    pub reload: bool,
    pub posted: Vec<PostedEntry>,
}

#[derive(Debug)]
pub struct UploadOrchestrator {
    selection: SelectionStore,
    phase: Phase,
    limit: SizeLimit,
    partial_success: PartialSuccessPolicy,
    content_required: bool,
    client: BoardClient,
}

impl UploadOrchestrator {
    pub fn new(config: &BoardConfig) -> Self {
        Self::with_client(config, BoardClient::new(config.server_url.clone()))
    }

    pub fn with_client(config: &BoardConfig, client: BoardClient) -> Self {
        Self {
            selection: SelectionStore::new(),
            phase: Phase::Idle,
            limit: SizeLimit {
                bytes: config.max_file_size_bytes(),
                text: config.max_file_size_text.clone(),
            },
            partial_success: config.partial_success,
            content_required: config.message_content_required,
            client,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == Phase::InProgress
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn size_limit(&self) -> &SizeLimit {
        &self.limit
    }

    pub fn content_required(&self) -> bool {
        self.content_required
    }

    /// The submit button is live only with files selected and nothing running.
    pub fn can_submit_files(&self) -> bool {
        !self.selection.is_empty() && !self.is_in_progress()
    }

    pub fn select_files(&mut self, candidates: Vec<FileRef>) -> Result<AddOutcome, SubmitRejected> {
        if self.is_in_progress() {
            return Err(SubmitRejected::AlreadyInProgress);
        }
        let outcome = self.selection.add(candidates, self.limit.bytes);
        log::debug!(
            "Selection: {} accepted, {} oversize, {} duplicate",
            outcome.accepted.len(),
            outcome.rejected_oversize.len(),
            outcome.rejected_duplicate.len()
        );
        Ok(outcome)
    }

    pub fn selection_notices(&self, outcome: &AddOutcome) -> Vec<Notification> {
        let mut notices = Vec::new();
        if !outcome.rejected_oversize.is_empty() {
            notices.push(Notification::error(format!(
                "These files exceed {}: {}",
                self.limit.text,
                join_names(outcome.rejected_oversize.iter().map(|f| f.name.as_str()))
            )));
        }
        if !outcome.rejected_duplicate.is_empty() {
            notices.push(Notification::warning(format!(
                "These files are already selected: {}",
                join_names(outcome.rejected_duplicate.iter().map(|f| f.name.as_str()))
            )));
        }
        if !outcome.accepted.is_empty() {
            notices.push(Notification::success(format!(
                "{} selected.",
                count_files(outcome.accepted.len())
            )));
        }
        notices
    }

    /// Drops one selected file. Ignored while an upload runs.
    pub fn remove_file(&mut self, index: usize) -> bool {
        if self.is_in_progress() {
            return false;
        }
        self.selection.remove_at(index).is_some()
    }

    pub fn reset_selection(&mut self) {
        if !self.is_in_progress() {
            self.selection.clear();
        }
    }

    pub fn begin_file_batch(&mut self, title: &str) -> Result<FileBatch, SubmitRejected> {
        if self.selection.is_empty() {
            return Err(SubmitRejected::NothingSelected);
        }
        if self.is_in_progress() {
            return Err(SubmitRejected::AlreadyInProgress);
        }

        self.phase = Phase::InProgress;
        log::info!("Starting upload of {} file(s)", self.selection.len());
        Ok(FileBatch {
            files: self.selection.snapshot(),
            title: title.trim().to_string(),
            client: self.client.clone(),
        })
    }

    pub fn complete_file_batch(&mut self, result: Result<BatchReport, BatchError>) -> Completion {
        self.phase = Phase::Idle;

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                log::error!("Upload batch aborted: {}", e);
                self.selection.clear();
                return Completion {
                    notifications: vec![Notification::error("An error occurred during upload.")],
                    clear_form: true,
                    ..Completion::default()
                };
            }
        };

        log::info!(
            "Upload batch finished: {} succeeded, {} failed",
            report.success_count,
            report.error_count
        );

        let mut completion = Completion {
            posted: report.posted.clone(),
            ..Completion::default()
        };

        match report.outcome() {
            BatchOutcome::AllSucceeded => {
                completion.notifications.push(Notification::success(format!(
                    "{} uploaded.",
                    count_files(report.success_count)
                )));
                self.selection.clear();
                completion.clear_form = true;
                completion.reload = true;
            }
            BatchOutcome::PartialSuccess => {
                completion.notifications.push(Notification::info(format!(
                    "{} succeeded, {} failed.",
                    report.success_count, report.error_count
                )));
                match self.partial_success {
                    PartialSuccessPolicy::ClearAndReload => {
                        self.selection.clear();
                        completion.clear_form = true;
                        completion.reload = true;
                    }
                    PartialSuccessPolicy::ClearOnly => {
                        self.selection.clear();
                        completion.clear_form = true;
                    }
                    PartialSuccessPolicy::Retain => {
                        let released = self.selection.release(&report.uploaded);
                        log::debug!(
                            "Released {} uploaded file(s), kept {} for retry",
                            released,
                            self.selection.len()
                        );
                    }
                }
            }
            BatchOutcome::AllFailed => {
                completion
                    .notifications
                    .push(Notification::error("All file uploads failed."));
            }
        }

        completion
    }

    pub fn begin_message(&mut self, title: &str, content: &str) -> Result<MessagePost, SubmitRejected> {
        if self.is_in_progress() {
            return Err(SubmitRejected::AlreadyInProgress);
        }

        let title = title.trim();
        let content = content.trim();
        if title.is_empty() {
            return Err(SubmitRejected::MissingTitle);
        }
        if self.content_required && content.is_empty() {
            return Err(SubmitRejected::MissingContent);
        }

        self.phase = Phase::InProgress;
        log::info!("Posting message {:?}", title);
        Ok(MessagePost {
            title: title.to_string(),
            content: content.to_string(),
            client: self.client.clone(),
        })
    }

    pub fn complete_message(&mut self, result: Result<PostedEntry, UploadError>) -> Completion {
        self.phase = Phase::Idle;

        match result {
            Ok(entry) => Completion {
                notifications: vec![Notification::success("Message posted.")],
                clear_form: true,
                reload: true,
                posted: vec![entry],
            },
            Err(UploadError::Server(reason)) => {
                log::warn!("Message rejected: {}", reason);
                Completion {
                    notifications: vec![Notification::error(reason)],
                    ..Completion::default()
                }
            }
            Err(e) => {
                log::error!("Message post failed: {}", e);
                Completion {
                    notifications: vec![Notification::error(
                        "An error occurred while posting the message.",
                    )],
                    ..Completion::default()
                }
            }
        }
    }
}

/// Snapshot of the selection taken at submit time.
#[derive(Debug)]
pub struct FileBatch {
    files: Vec<PendingFile>,
    title: String,
    client: BoardClient,
}

impl FileBatch {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Uploads every file in order, one request at a time. A failed file is
    /// counted and the loop moves on.
    pub async fn run(self, progress: &Sender<WorkerEvent>) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, file) in self.files.iter().enumerate() {
            progress
                .send(WorkerEvent::File(FileStatus {
                    index,
                    name: file.name.clone(),
                    status: UploadStatus::Processing,
                }))
                .unwrap_or_default();

            let title = effective_title(&self.title, file);
            let status = match self.client.upload_file(file, &title).await {
                Ok(message) => {
                    log::info!("Uploaded {}: {}", file.name, message);
                    report.success_count += 1;
                    report.posted.push(PostedEntry {
                        title,
                        body: format!("{} ({})", file.name, FileSizeUtils::format_size(file.size)),
                        kind: PostKind::File,
                    });
                    report.uploaded.push(file.clone());
                    UploadStatus::Success(message)
                }
                Err(e) => {
                    log::warn!("Upload of {} failed: {}", file.name, e);
                    report.error_count += 1;
                    UploadStatus::Error(e.to_string())
                }
            };

            progress
                .send(WorkerEvent::File(FileStatus {
                    index,
                    name: file.name.clone(),
                    status,
                }))
                .unwrap_or_default();
        }

        report
    }
}

#[derive(Debug)]
pub struct MessagePost {
    title: String,
    content: String,
    client: BoardClient,
}

impl MessagePost {
    pub async fn run(self) -> Result<PostedEntry, UploadError> {
        let message = self.client.post_message(&self.title, &self.content).await?;
        log::info!("Message posted: {}", message);
        Ok(PostedEntry {
            title: self.title,
            body: self.content,
            kind: PostKind::Message,
        })
    }
}

/// Title sent with a file: the shared title, or the file name when blank.
pub fn effective_title(title: &str, file: &PendingFile) -> String {
    let title = title.trim();
    if title.is_empty() {
        file.name.clone()
    } else {
        title.to_string()
    }
}

fn count_files(n: usize) -> String {
    if n == 1 {
        "1 file".to_string()
    } else {
        format!("{} files", n)
    }
}
