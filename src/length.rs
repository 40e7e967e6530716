//! Status length counting
//!
//! Links are shortened by the network, so every `http(s)://` URL counts as
//! [`URL_LENGTH`] characters no matter how long it is. Everything else counts
//! one per character.

use regex_lite::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Weighted length of any URL
pub const URL_LENGTH: usize = 23;

/// Default maximum status length
pub const DEFAULT_MAX_LENGTH: usize = 280;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^\s]+").expect("URL pattern is valid")
});

/// Draft text with its counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusInfo {
    /// Draft text
    pub status: String,
    /// Whether the draft can be sent
    pub valid: bool,
    /// Weighted length
    pub length: usize,
    /// Maximum weighted length
    pub max_length: usize,
}

impl StatusInfo {
    /// Count `status` against `max_length`
    pub fn check(status: impl Into<String>, max_length: usize) -> Self {
        let status = status.into();
        let length = weighted_length(&status);
        let valid = !status.trim().is_empty() && length <= max_length;
        Self {
            status,
            valid,
            length,
            max_length,
        }
    }

    /// Characters left before hitting the limit (negative when over)
    pub fn remaining(&self) -> i64 {
        self.max_length as i64 - self.length as i64
    }
}

/// Weighted length of a status
pub fn weighted_length(status: &str) -> usize {
    let mut length = 0;
    let mut last = 0;
    for url in URL_RE.find_iter(status) {
        length += status[last..url.start()].chars().count() + URL_LENGTH;
        last = url.end();
    }
    length + status[last..].chars().count()
}
