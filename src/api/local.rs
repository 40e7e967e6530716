//! Local backend that records statuses in the history database

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::Tweet;

use super::StatusApi;

/// Posts straight into the local status history
#[derive(Clone)]
pub struct LocalApi {
    db: Arc<Mutex<Database>>,
}

impl LocalApi {
    /// Create a local backend over an open database
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }
}

impl StatusApi for LocalApi {
    async fn post(&self, content: &str, in_reply_to: Option<i64>) -> Result<Tweet> {
        let db = self.db.lock().await;
        let tweet = db.insert_status(content, in_reply_to)?;
        match in_reply_to {
            Some(parent) => tracing::debug!("Recorded status {} in thread of {}", tweet.id, parent),
            None => tracing::debug!("Recorded status {}", tweet.id),
        }
        Ok(tweet)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Tweet>> {
        self.db.lock().await.recent_statuses(limit)
    }

    async fn clear(&self) -> Result<()> {
        let count = self.db.lock().await.clear_statuses()?;
        tracing::debug!("Cleared {} statuses", count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_post_then_recent() {
        let dir = tempdir().unwrap();
        let db = Database::open_path(&dir.path().join("test.sqlite")).unwrap();
        let api = LocalApi::new(db);

        let posted = api.post("hello", None).await.unwrap();
        let reply = api.post("again", Some(posted.id)).await.unwrap();

        assert_eq!(posted.in_reply_to, None);
        assert_eq!(reply.in_reply_to, Some(posted.id));

        let recent = api.recent(1).await.unwrap();
        assert_eq!(recent, vec![reply]);
        assert_eq!(recent[0].in_reply_to, Some(posted.id));

        api.clear().await.unwrap();
        assert!(api.recent(5).await.unwrap().is_empty());
    }
}
