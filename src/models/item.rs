//! Rows of the compose list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tweet;
use crate::diff::Diffable;

/// A previously posted status. Never changes once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousStatusItem {
    /// Status ID
    pub id: i64,
    /// Status text
    pub text: String,
    /// When the status was created
    pub created_at: DateTime<Utc>,
}

impl From<&Tweet> for PreviousStatusItem {
    fn from(tweet: &Tweet) -> Self {
        Self {
            id: tweet.id,
            text: tweet.text.clone(),
            created_at: tweet.created_at,
        }
    }
}

/// Draft state of the compose box
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorItem {
    /// Draft text
    pub status: String,
    /// Weighted length of the draft
    pub status_length: usize,
    /// Maximum weighted length
    pub max_length: usize,
    /// Whether the draft can be sent
    pub valid: bool,
    /// Keep the composer open after sending
    pub keep_open: bool,
    /// Post as a thread continuing the previous status
    pub enable_thread: bool,
    /// True only for the very first render of the editor
    pub initial_value: bool,
    /// One-shot signal: reset visual state after a send
    pub clear: bool,
}

impl EditorItem {
    /// Copy with the draft reset, keeping flags and `max_length`
    pub fn cleared(&self, status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            status_length: 0,
            valid: false,
            initial_value: false,
            clear: true,
            ..self.clone()
        }
    }

    /// Copy with only the counter fields replaced
    pub fn with_counter(&self, valid: bool, length: usize, max_length: usize) -> Self {
        Self {
            valid,
            status_length: length,
            max_length,
            ..self.clone()
        }
    }
}

/// A row of the compose list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    /// A previously posted status
    PreviousStatus(PreviousStatusItem),
    /// The compose box (always the last row)
    Editor(EditorItem),
}

impl Item {
    /// Get the editor state if this row is the editor
    pub const fn as_editor(&self) -> Option<&EditorItem> {
        match self {
            Self::Editor(editor) => Some(editor),
            Self::PreviousStatus(_) => None,
        }
    }

    /// Whether this row is the editor
    pub const fn is_editor(&self) -> bool {
        matches!(self, Self::Editor(_))
    }
}

impl From<&Tweet> for Item {
    fn from(tweet: &Tweet) -> Self {
        Self::PreviousStatus(tweet.into())
    }
}

impl Diffable for Item {
    fn same_row(&self, other: &Self) -> bool {
        match (self, other) {
            // At most one editor row exists at a time
            (Self::Editor(_), Self::Editor(_)) => true,
            (Self::PreviousStatus(a), Self::PreviousStatus(b)) => a.id == b.id,
            _ => false,
        }
    }

    fn same_content(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Editor(a), Self::Editor(b)) => a == b,
            // Posted statuses are immutable, so the id stands in for the content
            (Self::PreviousStatus(a), Self::PreviousStatus(b)) => a.id == b.id,
            _ => false,
        }
    }
}
