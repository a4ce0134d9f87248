use crate::upload::{FileStatus, UploadStatus, WorkerEvent};
use std::sync::mpsc::Receiver;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActionProgress {
    #[default]
    NotStarted,
    Uploading {
        total: usize,
        current: usize,
        successful: usize,
        failed: usize,
    },
    Posting,
    Completed {
        total: usize,
        successful: usize,
        failed: usize,
    },
}

/// Which job the worker thread is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    FileBatch,
    Message,
}

#[derive(Debug, Default)]
pub struct FileForm {
    pub title: String,
}

#[derive(Debug, Default)]
pub struct MessageForm {
    pub title: String,
    pub content: String,
}

impl MessageForm {
    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }
}

#[derive(Default)]
pub struct UploadState {
    pub progress: ActionProgress,
    pub current_file: Option<String>,
    pub file_statuses: Vec<FileStatus>,
    pub show_details: bool,
    pub job: Option<JobKind>,
    pub worker_receiver: Option<Receiver<WorkerEvent>>,
}

impl UploadState {
    pub fn clear(&mut self) {
        *self = UploadState::default();
    }

    pub fn start(&mut self, job: JobKind, total: usize, receiver: Receiver<WorkerEvent>) {
        self.progress = match job {
            JobKind::FileBatch => ActionProgress::Uploading {
                total,
                current: 0,
                successful: 0,
                failed: 0,
            },
            JobKind::Message => ActionProgress::Posting,
        };
        self.current_file = None;
        self.file_statuses.clear();
        self.job = Some(job);
        self.worker_receiver = Some(receiver);
    }

    /// Folds one per-file report into the running counters.
    pub fn apply_file_status(&mut self, status: FileStatus) {
        if let ActionProgress::Uploading {
            current,
            successful,
            failed,
            ..
        } = &mut self.progress
        {
            match &status.status {
                UploadStatus::Processing => *current = status.index + 1,
                UploadStatus::Success(_) => *successful += 1,
                UploadStatus::Error(_) => *failed += 1,
            }
        }

        self.current_file = Some(status.name.clone());
        if matches!(status.status, UploadStatus::Processing) {
            return;
        }
        self.file_statuses.push(status);
    }

    pub fn finish(&mut self) {
        self.progress = match &self.progress {
            ActionProgress::Uploading {
                total,
                successful,
                failed,
                ..
            } => ActionProgress::Completed {
                total: *total,
                successful: *successful,
                failed: *failed,
            },
            ActionProgress::Posting => ActionProgress::NotStarted,
            other => other.clone(),
        };
        self.job = None;
        self.worker_receiver = None;
    }

    pub fn get_progress_percentage(&self) -> f32 {
        match &self.progress {
            ActionProgress::NotStarted | ActionProgress::Posting => 0.0,
            ActionProgress::Uploading {
                total,
                successful,
                failed,
                ..
            } => {
                if *total == 0 {
                    0.0
                } else {
                    ((*successful + *failed) as f32) / (*total as f32)
                }
            }
            ActionProgress::Completed { total, .. } => {
                if *total == 0 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }

    pub fn get_status_text(&self) -> String {
        match &self.progress {
            ActionProgress::NotStarted => String::new(),
            ActionProgress::Posting => "Posting message...".to_string(),
            ActionProgress::Uploading {
                total,
                current,
                successful,
                failed,
            } => {
                format!(
                    "Progress: {}/{} files | ✅ Success: {} | ❌ Failed: {}",
                    current, total, successful, failed
                )
            }
            ActionProgress::Completed {
                total,
                successful,
                failed,
            } => {
                format!(
                    "Final Status: {}/{} files | ✅ Success: {} | ❌ Failed: {}",
                    successful + failed,
                    total,
                    successful,
                    failed
                )
            }
        }
    }
}
