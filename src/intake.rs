//! Turning dropped or picked paths into selection candidates.

use crate::selection::FileRef;
use eframe::egui::{DroppedFile, Pos2, Rect};
use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Reads name and size for a regular file. Directories and unreadable
/// paths yield `None`.
pub fn file_ref_from_path(path: &Path) -> Option<FileRef> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            log::warn!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };
    if !metadata.is_file() {
        log::warn!("Skipping {}: not a regular file", path.display());
        return None;
    }

    let name = path.file_name()?.to_string_lossy().to_string();
    Some(FileRef::new(name, metadata.len(), path))
}

pub fn file_refs_from_paths<I>(paths: I) -> Vec<FileRef>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths
        .into_iter()
        .filter_map(|path| file_ref_from_path(&path))
        .collect()
}

/// Opens the native multi-file picker. Every call starts from a fresh
/// dialog, so the same file can be chosen again after removing it.
pub fn pick_files() -> Vec<FileRef> {
    match FileDialog::new().set_title("Select files").pick_files() {
        Some(paths) => file_refs_from_paths(paths),
        None => Vec::new(),
    }
}

pub fn refs_from_dropped(dropped: &[DroppedFile]) -> Vec<FileRef> {
    dropped
        .iter()
        .filter_map(|file| match &file.path {
            Some(path) => file_ref_from_path(path),
            None => {
                log::warn!("Dropped item {:?} has no path; skipped", file.name);
                None
            }
        })
        .collect()
}

/// Drag-hover state of the drop target.
///
/// The highlight follows the pointer against the zone's whole rect, so
/// crossing child widgets inside the zone never turns it off.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DropZone {
    active: bool,
}

impl DropZone {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Called every frame with the current drag state.
    pub fn on_drag(&mut self, files_hovering: bool, pointer: Option<Pos2>, zone: Rect) {
        self.active = files_hovering && Self::inside(pointer, zone);
    }

    /// Decides whether a drop lands in the zone. Drops elsewhere in the
    /// window are swallowed.
    pub fn accepts_drop(&mut self, pointer: Option<Pos2>, zone: Rect) -> bool {
        self.active = false;
        Self::inside(pointer, zone)
    }

    pub fn reset(&mut self) {
        self.active = false;
    }

    // Several platforms stop reporting the pointer during an OS drag; an
    // unknown position counts as inside.
    fn inside(pointer: Option<Pos2>, zone: Rect) -> bool {
        pointer.map_or(true, |pos| zone.contains(pos))
    }
}
