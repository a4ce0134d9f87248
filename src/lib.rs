//! Desktop client for the file/message bulletin board.
//!
//! Files are picked or dropped into a selection, checked for size and
//! duplicates, then uploaded one by one to `/upload/file`. Short text posts
//! go to `/upload/message`.

pub mod app;
pub mod board;
pub mod config;
pub mod intake;
pub mod lifecycle;
pub mod logging;
pub mod notify;
pub mod selection;
pub mod upload;
pub mod utils;

pub use app::BoardUploader;
pub use config::{BoardConfig, ConfigError, PartialSuccessPolicy};
