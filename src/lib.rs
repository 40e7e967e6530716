//! # Wren 🐦
//!
//! A tiny status composer with a diffed compose list.
//!
//! ## Overview
//!
//! The compose screen is a single list: the statuses you posted last,
//! followed by the editor you are typing in. Every change to that list is
//! diffed off the interactive path and handed to the presentation layer as a
//! minimal set of update instructions together with the new list.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Presentation (CLI)                      │
//! │     Sends compose events, renders list updates              │
//! └─────────────────────────────────────────────────────────────┘
//!            │ ComposeEvent                   ▲ ListUpdate
//!            ▼                                │
//! ┌─────────────────────┐   ListChange   ┌─────────────────────┐
//! │   ComposeSession    │ ─────────────▶ │    Status adapter   │
//! │                     │                │                     │
//! │ • Draft + counter   │                │ • Owns the list     │
//! │ • Send / clear      │                │ • FIFO worker       │
//! └─────────────────────┘                └─────────────────────┘
//!            │                                │
//!            ▼                                ▼
//! ┌─────────────────────┐                ┌─────────────────────┐
//! │   StatusApi / DB    │                │     Diff engine     │
//! │                     │                │                     │
//! │ • Post statuses     │                │ • Myers list diff   │
//! │ • Status history    │                │ • Moves & changes   │
//! └─────────────────────┘                └─────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`adapter`] — Single-writer owner of the compose list
//! - [`api`] — Status posting backends
//! - [`compose`] — Compose session (events → list changes)
//! - [`config`] — Configuration management
//! - [`db`] — `SQLite` status history
//! - [`diff`] — List diff engine
//! - [`length`] — Status length counting
//! - [`models`] — Data models (Tweet, Item, FooterState)
//! - [`paths`] — Config and data file locations
//!
//! ## Example
//!
//! ```no_run
//! use wren::adapter::spawn_adapter;
//! use wren::models::EditorItem;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (adapter, mut updates) = spawn_adapter();
//!     adapter.update_editor(EditorItem::default()).await?;
//!
//!     if let Some(update) = updates.recv().await {
//!         println!("revision {}: {} ops", update.revision, update.script.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod adapter;
pub mod api;
pub mod compose;
pub mod config;
pub mod db;
pub mod diff;
pub mod length;
pub mod models;
pub mod paths;

// Re-export main types for convenience
pub use adapter::{AdapterError, AdapterHandle, ListUpdate, spawn_adapter};
pub use compose::{ComposeEvent, ComposeSession, EventOutcome};
pub use config::Config;
pub use db::Database;
pub use diff::{Diffable, EditOp, EditScript, diff};
pub use models::{EditorItem, FooterState, Item, PreviousStatusItem, Tweet};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
