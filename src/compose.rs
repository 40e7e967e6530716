//! Compose session
//!
//! Turns raw UI events (keystrokes, toggles, send) into adapter calls. The
//! session keeps the draft, derives the editor row from it, and only pushes
//! the editor when it actually changed.

use anyhow::Result;

use crate::adapter::AdapterHandle;
use crate::api::StatusApi;
use crate::config::Config;
use crate::length::StatusInfo;
use crate::models::{EditorItem, Tweet};

/// Input from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeEvent {
    /// Draft text changed
    StatusChanged(String),
    /// "Keep open" toggled
    KeepOpenChanged(bool),
    /// "Post as thread" toggled
    EnableThreadChanged(bool),
    /// Maximum length changed (e.g. settings reloaded)
    MaxLengthChanged(usize),
    /// Send the draft
    Send,
    /// Discard the draft
    Clear,
    /// Forget previously posted statuses
    ClearHistory,
}

/// What handling an event resulted in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The list was updated
    Updated,
    /// Nothing changed
    Unchanged,
    /// The draft was posted
    Posted {
        /// The new status
        tweet: Tweet,
        /// Whether the composer should close now
        close: bool,
    },
    /// The draft could not be sent
    Rejected(String),
}

/// Compose state for one screen
pub struct ComposeSession<A> {
    api: A,
    adapter: AdapterHandle,
    config: Config,
    status: String,
    keep_open: bool,
    enable_thread: bool,
    last_pushed: Option<EditorItem>,
}

impl<A: StatusApi> ComposeSession<A> {
    /// Create a session; call [`ComposeSession::start`] before handling events
    pub fn new(api: A, adapter: AdapterHandle, config: Config) -> Self {
        Self {
            keep_open: config.keep_open,
            enable_thread: config.enable_thread,
            api,
            adapter,
            config,
            status: String::new(),
            last_pushed: None,
        }
    }

    /// Push the first editor and load the previous statuses
    pub async fn start(&mut self, initial_status: Option<String>) -> Result<()> {
        self.status = initial_status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_default();
        self.push_editor().await?;

        let previous = self.api.recent(self.config.history_limit).await?;
        self.adapter.set_previous_status(previous).await?;
        Ok(())
    }

    /// Handle a single event
    pub async fn handle(&mut self, event: ComposeEvent) -> Result<EventOutcome> {
        match event {
            ComposeEvent::StatusChanged(status) => {
                self.status = status;
                self.push_editor().await
            }
            ComposeEvent::KeepOpenChanged(enabled) => {
                self.keep_open = enabled;
                self.push_editor().await
            }
            ComposeEvent::EnableThreadChanged(enabled) => {
                self.enable_thread = enabled;
                self.push_editor().await
            }
            ComposeEvent::MaxLengthChanged(max_length) => self.recount(max_length).await,
            ComposeEvent::Send => self.send().await,
            ComposeEvent::Clear => {
                self.status.clear();
                self.last_pushed = None;
                self.adapter.clear_editor().await?;
                Ok(EventOutcome::Updated)
            }
            ComposeEvent::ClearHistory => {
                self.api.clear().await?;
                self.adapter.set_previous_status(Vec::new()).await?;
                Ok(EventOutcome::Updated)
            }
        }
    }

    /// Counter for the current draft
    pub fn status_info(&self) -> StatusInfo {
        StatusInfo::check(self.status.clone(), self.config.max_status_length)
    }

    /// Whether closing now would lose something the user typed
    pub fn has_unsent_draft(&self) -> bool {
        !self.status.trim().is_empty() && self.status != self.config.footer_state().draft_prefix()
    }

    fn editor_item(&self) -> EditorItem {
        let info = self.status_info();
        EditorItem {
            status: info.status,
            status_length: info.length,
            max_length: info.max_length,
            valid: info.valid,
            keep_open: self.keep_open,
            enable_thread: self.enable_thread,
            initial_value: false,
            clear: false,
        }
    }

    async fn push_editor(&mut self) -> Result<EventOutcome> {
        let item = self.editor_item();
        if self.last_pushed.as_ref() == Some(&item) {
            return Ok(EventOutcome::Unchanged);
        }
        self.adapter.update_editor(item.clone()).await?;
        self.last_pushed = Some(item);
        Ok(EventOutcome::Updated)
    }

    async fn recount(&mut self, max_length: usize) -> Result<EventOutcome> {
        self.config.max_status_length = max_length;
        let info = self.status_info();
        let item = self.editor_item();
        if self.last_pushed.as_ref() == Some(&item) {
            return Ok(EventOutcome::Unchanged);
        }
        self.adapter
            .update_status_counter(info.valid, info.length, info.max_length)
            .await?;
        self.last_pushed = Some(item);
        Ok(EventOutcome::Updated)
    }

    async fn send(&mut self) -> Result<EventOutcome> {
        let info = self.status_info();
        if !info.valid {
            let reason = if info.status.trim().is_empty() {
                "Status is empty".to_string()
            } else {
                format!("Status is too long ({}/{})", info.length, info.max_length)
            };
            return Ok(EventOutcome::Rejected(reason));
        }

        let in_reply_to = if self.enable_thread {
            self.api.recent(1).await?.last().map(|t| t.id)
        } else {
            None
        };
        let tweet = self.api.post(&info.status, in_reply_to).await?;
        tracing::debug!("Posted status {}", tweet.id);

        // The draft is gone once posted, even if refreshing the list fails
        let footer = self.config.footer_state();
        self.status = footer.draft_prefix();
        self.last_pushed = None;

        let previous = match self.api.recent(self.config.history_limit).await {
            Ok(previous) => previous,
            Err(e) => {
                tracing::warn!("Failed to reload history after posting {}: {e:#}", tweet.id);
                vec![tweet.clone()]
            }
        };
        self.adapter
            .update_previous_and_clear_editor(previous, footer)
            .await?;

        Ok(EventOutcome::Posted {
            tweet,
            close: !self.keep_open,
        })
    }
}
