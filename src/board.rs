//! Posts shown on the board, each collapsible with a ▼/▲ toggle.

use crate::upload::PostedEntry;
use crate::utils::time_ago::{local_timestamp, time_ago};
use chrono::{DateTime, Utc};

pub const COLLAPSED_GLYPH: &str = "▼";
pub const EXPANDED_GLYPH: &str = "▲";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    File,
    Message,
}

#[derive(Debug, Clone)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub kind: PostKind,
    pub created_at: DateTime<Utc>,
    pub expanded: bool,
    pub relative_time: String,
    pub absolute_time: String,
}

impl Post {
    pub fn glyph(&self) -> &'static str {
        if self.expanded {
            EXPANDED_GLYPH
        } else {
            COLLAPSED_GLYPH
        }
    }
}

#[derive(Debug, Default)]
pub struct Board {
    posts: Vec<Post>,
    next_id: u64,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a post at the top of the board, collapsed.
    pub fn push(&mut self, entry: PostedEntry, created_at: DateTime<Utc>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.posts.insert(
            0,
            Post {
                id,
                title: entry.title,
                body: entry.body,
                kind: entry.kind,
                created_at,
                expanded: false,
                relative_time: time_ago(created_at, created_at),
                absolute_time: local_timestamp(created_at),
            },
        );
        id
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Flips a post open or closed and returns its new glyph. Unknown ids
    /// are ignored.
    pub fn toggle(&mut self, id: u64) -> Option<&'static str> {
        let post = self.posts.iter_mut().find(|p| p.id == id)?;
        post.expanded = !post.expanded;
        Some(post.glyph())
    }

    /// Collapses everything, as on a fresh load.
    pub fn collapse_all(&mut self) {
        for post in &mut self.posts {
            post.expanded = false;
        }
    }

    pub fn refresh_timestamps(&mut self, now: DateTime<Utc>) {
        for post in &mut self.posts {
            post.relative_time = time_ago(post.created_at, now);
        }
    }
}
