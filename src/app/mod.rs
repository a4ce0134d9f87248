pub mod events;
mod state;
mod ui;

use crate::board::Board;
use crate::config::BoardConfig;
use crate::intake::{self, DropZone};
use crate::lifecycle::{close_decision, CloseDecision, RefreshTimer, ReloadSchedule};
use crate::notify::{Notification, Notifier};
use crate::selection::FileRef;
use crate::upload::{BatchError, Completion, UploadError, UploadOrchestrator, WorkerEvent};
use chrono::Utc;
use eframe::{egui, App};
use events::{EventQueue, Region, UiEvent};
pub use state::{ActionProgress, FileForm, JobKind, MessageForm, UploadState};
use std::sync::mpsc as std_mpsc;
use std::time::{Duration, Instant};

const BUSY_REPAINT: Duration = Duration::from_millis(100);

pub struct BoardUploader {
    config: BoardConfig,
    orchestrator: UploadOrchestrator,
    board: Board,
    notifier: Notifier,
    events: EventQueue,
    drop_zone: DropZone,
    drop_zone_rect: Option<egui::Rect>,
    file_form: FileForm,
    message_form: MessageForm,
    state: UploadState,
    reload: ReloadSchedule,
    reloading: bool,
    timestamps: RefreshTimer,
    confirm_close: bool,
    force_close: bool,
}

impl BoardUploader {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: BoardConfig) -> Self {
        Self::with_config(config)
    }

    fn with_config(config: BoardConfig) -> Self {
        log::info!(
            "Max upload size {} ({} bytes)",
            config.max_file_size_text,
            config.max_file_size_bytes()
        );

        let mut events = EventQueue::new();
        for region in Region::ALL {
            events.subscribe(region);
        }

        Self {
            orchestrator: UploadOrchestrator::new(&config),
            board: Board::new(),
            notifier: Notifier::new(config.notification_duration),
            events,
            drop_zone: DropZone::default(),
            drop_zone_rect: None,
            file_form: FileForm::default(),
            message_form: MessageForm::default(),
            state: UploadState::default(),
            reload: ReloadSchedule::default(),
            reloading: false,
            timestamps: RefreshTimer::new(config.timestamp_refresh, Instant::now()),
            confirm_close: false,
            force_close: false,
            config,
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifier.show(notification, Instant::now());
    }

    fn dispatch(&mut self, ctx: &egui::Context, event: UiEvent) {
        match event {
            UiEvent::FilesDropped(files) => self.handle_selection(files),
            UiEvent::OpenPicker => {
                if self.orchestrator.is_in_progress() {
                    self.notify(Notification::info(
                        "An upload is in progress. Please try again shortly.",
                    ));
                } else {
                    let files = intake::pick_files();
                    self.handle_selection(files);
                }
            }
            UiEvent::RemoveFile(index) => {
                self.orchestrator.remove_file(index);
            }
            UiEvent::ClearFiles => self.reset_file_form(),
            UiEvent::SubmitFiles => self.start_file_upload(),
            UiEvent::SubmitMessage => self.start_message_post(),
            UiEvent::TogglePost(id) => {
                if self.board.toggle(id).is_none() {
                    log::debug!("Toggle for unknown post {}", id);
                }
            }
            UiEvent::CloseRequested => self.handle_close_request(ctx),
            UiEvent::ConfirmClose => {
                log::warn!("Closing with an upload still running");
                self.set_modal(false);
                self.force_close = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            UiEvent::CancelClose => self.set_modal(false),
            UiEvent::DismissNotification => self.notifier.dismiss(Instant::now()),
            UiEvent::OpenBoardInBrowser => {
                if let Err(e) = open::that(&self.config.server_url) {
                    log::warn!("Could not open {}: {}", self.config.server_url, e);
                }
            }
        }
    }

    fn handle_selection(&mut self, files: Vec<FileRef>) {
        if files.is_empty() {
            return;
        }
        match self.orchestrator.select_files(files) {
            Ok(outcome) => {
                for notice in self.orchestrator.selection_notices(&outcome) {
                    self.notify(notice);
                }
            }
            Err(rejected) => self.notify(rejected.notification()),
        }
    }

    fn reset_file_form(&mut self) {
        self.orchestrator.reset_selection();
        self.file_form.title.clear();
        self.drop_zone.reset();
    }

    fn start_file_upload(&mut self) {
        let batch = match self.orchestrator.begin_file_batch(&self.file_form.title) {
            Ok(batch) => batch,
            Err(rejected) => {
                self.notify(rejected.notification());
                return;
            }
        };

        let (sender, receiver) = std_mpsc::channel();
        self.begin_job(JobKind::FileBatch, batch.len(), receiver);

        std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    let failure = BatchError::Unexpected(format!("runtime: {}", e));
                    sender.send(WorkerEvent::BatchDone(Err(failure))).unwrap_or_default();
                    return;
                }
            };
            let report = rt.block_on(batch.run(&sender));
            sender.send(WorkerEvent::BatchDone(Ok(report))).unwrap_or_default();
        });
    }

    fn start_message_post(&mut self) {
        let post = match self
            .orchestrator
            .begin_message(&self.message_form.title, &self.message_form.content)
        {
            Ok(post) => post,
            Err(rejected) => {
                self.notify(rejected.notification());
                return;
            }
        };

        let (sender, receiver) = std_mpsc::channel();
        self.begin_job(JobKind::Message, 0, receiver);

        std::thread::spawn(move || {
            let result = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(post.run()),
                Err(e) => Err(UploadError::Interrupted(format!("runtime: {}", e))),
            };
            sender.send(WorkerEvent::MessageDone(result)).unwrap_or_default();
        });
    }

    /// A new job supersedes any reload still pending from the previous one,
    /// so the reload can never fire while a worker is running.
    fn begin_job(
        &mut self,
        job: JobKind,
        total: usize,
        receiver: std_mpsc::Receiver<WorkerEvent>,
    ) {
        if self.reload.cancel() {
            log::debug!("Pending reload cancelled by new {:?} job", job);
        }
        self.reloading = false;
        self.state.start(job, total, receiver);
    }

    /// Drains worker reports. A worker that hangs up without a final report
    /// still settles its job, so the in-progress flag is always released.
    pub fn update_state(&mut self) {
        let Some(receiver) = self.state.worker_receiver.take() else {
            return;
        };

        let mut settled = None;
        loop {
            match receiver.try_recv() {
                Ok(WorkerEvent::File(status)) => self.state.apply_file_status(status),
                Ok(WorkerEvent::BatchDone(result)) => {
                    settled = Some(self.orchestrator.complete_file_batch(result));
                    break;
                }
                Ok(WorkerEvent::MessageDone(result)) => {
                    settled = Some(self.orchestrator.complete_message(result));
                    break;
                }
                Err(std_mpsc::TryRecvError::Empty) => break,
                Err(std_mpsc::TryRecvError::Disconnected) => {
                    log::error!("Upload worker hung up without a result");
                    settled = Some(match self.state.job {
                        Some(JobKind::Message) => self.orchestrator.complete_message(Err(
                            UploadError::Interrupted("worker stopped".to_string()),
                        )),
                        _ => self.orchestrator.complete_file_batch(Err(
                            BatchError::Unexpected("worker stopped".to_string()),
                        )),
                    });
                    break;
                }
            }
        }

        match settled {
            Some(completion) => {
                let job = self.state.job;
                self.state.finish();
                self.apply_completion(job, completion);
            }
            None => self.state.worker_receiver = Some(receiver),
        }
    }

    fn apply_completion(&mut self, job: Option<JobKind>, completion: Completion) {
        let now = Instant::now();
        for notification in completion.notifications {
            self.notifier.show(notification, now);
        }

        let posted_at = Utc::now();
        for entry in completion.posted {
            self.board.push(entry, posted_at);
        }

        if completion.clear_form {
            match job {
                Some(JobKind::Message) => self.message_form.clear(),
                _ => {
                    self.file_form.title.clear();
                    self.drop_zone.reset();
                }
            }
        }

        if completion.reload {
            self.reloading = true;
            self.reload.schedule(now, self.config.reload_delay);
        }
    }

    /// Fresh-load state: forms and selection emptied, posts collapsed,
    /// timestamps recomputed.
    fn reload_board(&mut self) {
        log::info!("Reloading board");
        self.orchestrator.reset_selection();
        self.file_form.title.clear();
        self.message_form.clear();
        self.drop_zone.reset();
        if self.state.worker_receiver.is_none() {
            self.state.clear();
        }
        self.board.collapse_all();
        self.board.refresh_timestamps(Utc::now());
        self.reloading = false;
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if self.force_close {
            return;
        }
        if close_decision(self.orchestrator.is_in_progress(), self.reloading)
            == CloseDecision::Confirm
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.set_modal(true);
        }
    }

    /// While the close prompt is up only window-level events get through.
    fn set_modal(&mut self, modal: bool) {
        self.confirm_close = modal;
        for region in Region::ALL {
            if region == Region::Window {
                continue;
            }
            if modal {
                self.events.unsubscribe(region);
            } else {
                self.events.subscribe(region);
            }
        }
    }

    fn collect_drops(&mut self, ctx: &egui::Context) {
        let (hovering, dropped, pointer) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
                i.pointer.hover_pos(),
            )
        });

        let Some(zone) = self.drop_zone_rect else {
            return;
        };
        self.drop_zone.on_drag(hovering, pointer, zone);

        if !dropped.is_empty() {
            if self.drop_zone.accepts_drop(pointer, zone) {
                let files = intake::refs_from_dropped(&dropped);
                self.events.emit(UiEvent::FilesDropped(files));
            } else {
                log::debug!("Ignored {} file(s) dropped outside the zone", dropped.len());
            }
        }
    }

    fn run_timers(&mut self, ctx: &egui::Context) {
        let now = Instant::now();

        if !self.orchestrator.is_in_progress() && self.reload.take_due(now) {
            self.reload_board();
        }
        if self.timestamps.poll(now) {
            self.board.refresh_timestamps(Utc::now());
        }

        let mut next = self.timestamps.until_next(now);
        if let Some(left) = self.notifier.remaining(now) {
            next = next.min(left);
        }
        if let Some(left) = self.reload.until_due(now) {
            next = next.min(left);
        }
        if self.orchestrator.is_in_progress() {
            next = next.min(BUSY_REPAINT);
        }
        ctx.request_repaint_after(next);
    }
}

impl App for BoardUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state();

        if ctx.input(|i| i.viewport().close_requested()) {
            self.events.emit(UiEvent::CloseRequested);
        }
        self.collect_drops(ctx);
        self.render(ctx);

        let raised = self.events.drain();
        if !raised.is_empty() {
            for event in raised {
                self.dispatch(ctx, event);
            }
            ctx.request_repaint();
        }

        self.run_timers(ctx);
    }
}
