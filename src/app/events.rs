//! UI events, tagged with the screen region that raised them.
//!
//! Regions only emit into the queue; the app decides which regions it
//! listens to and handles whatever it drains.

use crate::selection::FileRef;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    DropZone,
    FilePicker,
    FileList,
    FileForm,
    MessageForm,
    Board,
    Window,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::DropZone,
        Region::FilePicker,
        Region::FileList,
        Region::FileForm,
        Region::MessageForm,
        Region::Board,
        Region::Window,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    FilesDropped(Vec<FileRef>),
    OpenPicker,
    RemoveFile(usize),
    ClearFiles,
    SubmitFiles,
    SubmitMessage,
    TogglePost(u64),
    CloseRequested,
    ConfirmClose,
    CancelClose,
    DismissNotification,
    OpenBoardInBrowser,
}

impl UiEvent {
    pub fn region(&self) -> Region {
        match self {
            UiEvent::FilesDropped(_) => Region::DropZone,
            UiEvent::OpenPicker => Region::FilePicker,
            UiEvent::RemoveFile(_) | UiEvent::ClearFiles => Region::FileList,
            UiEvent::SubmitFiles => Region::FileForm,
            UiEvent::SubmitMessage => Region::MessageForm,
            UiEvent::TogglePost(_) => Region::Board,
            UiEvent::CloseRequested
            | UiEvent::ConfirmClose
            | UiEvent::CancelClose
            | UiEvent::DismissNotification
            | UiEvent::OpenBoardInBrowser => Region::Window,
        }
    }
}

#[derive(Debug, Default)]
pub struct EventQueue {
    subscribed: HashSet<Region>,
    pending: VecDeque<UiEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, region: Region) {
        self.subscribed.insert(region);
    }

    pub fn unsubscribe(&mut self, region: Region) {
        self.subscribed.remove(&region);
    }

    pub fn is_subscribed(&self, region: Region) -> bool {
        self.subscribed.contains(&region)
    }

    /// Queues `event` if its region is subscribed. Returns whether it was kept.
    pub fn emit(&mut self, event: UiEvent) -> bool {
        if !self.is_subscribed(event.region()) {
            log::trace!("Dropping {:?} from unsubscribed region", event);
            return false;
        }
        self.pending.push_back(event);
        true
    }

    pub fn drain(&mut self) -> Vec<UiEvent> {
        self.pending.drain(..).collect()
    }
}
