//! Status posting backends

pub mod local;

use anyhow::Result;

use crate::models::Tweet;

pub use local::LocalApi;

/// Backend that statuses are posted to
#[allow(async_fn_in_trait)]
pub trait StatusApi {
    /// Post a new status, optionally continuing a thread
    async fn post(&self, content: &str, in_reply_to: Option<i64>) -> Result<Tweet>;

    /// Get the most recent statuses, oldest first
    async fn recent(&self, limit: usize) -> Result<Vec<Tweet>>;

    /// Forget all previously posted statuses
    async fn clear(&self) -> Result<()>;
}
