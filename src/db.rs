//! Database module for `SQLite` storage of posted statuses

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::path::PathBuf;

use crate::models::Tweet;
use crate::paths;

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the default location
    pub fn open() -> Result<Self> {
        let path = Self::default_path()?;
        Self::open_path(&path)
    }

    /// Open or create the database at a specific path
    pub fn open_path(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let conn = Connection::open(path).context("Failed to open database")?;

        let db = Self { conn };
        db.init()?;

        Ok(db)
    }

    /// Get the default database path
    pub fn default_path() -> Result<PathBuf> {
        paths::database_path()
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            -- Posted statuses
            CREATE TABLE IF NOT EXISTS statuses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                created_at TEXT NOT NULL,
                in_reply_to INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_statuses_created_at ON statuses(created_at);
            ",
        )?;

        // Databases created before threads were stored lack the reply column
        if self.conn.prepare("SELECT in_reply_to FROM statuses LIMIT 0").is_err() {
            self.conn
                .execute("ALTER TABLE statuses ADD COLUMN in_reply_to INTEGER", [])?;
            tracing::debug!("Added in_reply_to column to statuses");
        }

        Ok(())
    }

    /// Record a new status and return it with its assigned ID
    pub fn insert_status(&self, text: &str, in_reply_to: Option<i64>) -> Result<Tweet> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO statuses (text, created_at, in_reply_to) VALUES (?1, ?2, ?3)",
            params![text, created_at.to_rfc3339(), in_reply_to],
        )?;
        Ok(Tweet::new(self.conn.last_insert_rowid(), text, created_at).replying_to(in_reply_to))
    }

    /// Get the most recent `limit` statuses, oldest first
    pub fn recent_statuses(&self, limit: usize) -> Result<Vec<Tweet>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, created_at, in_reply_to FROM statuses
             ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;

        let tweets = stmt.query_map(params![limit as i64], Self::row_to_tweet)?;
        let mut tweets = tweets.collect::<Result<Vec<_>, _>>()?;
        tweets.reverse();
        Ok(tweets)
    }

    /// Delete all statuses, returning how many were removed
    pub fn clear_statuses(&self) -> Result<usize> {
        let count = self.conn.execute("DELETE FROM statuses", [])?;
        Ok(count)
    }

    /// Helper to convert a row to a `Tweet`
    fn row_to_tweet(row: &rusqlite::Row<'_>) -> rusqlite::Result<Tweet> {
        let created_at: String = row.get(2)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
            })?
            .with_timezone(&Utc);

        Ok(Tweet {
            id: row.get(0)?,
            text: row.get(1)?,
            created_at,
            in_reply_to: row.get(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_init() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let _db = Database::open_path(&path).unwrap();
        // Should create without error
    }

    #[test]
    fn test_status_history() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let db = Database::open_path(&path).unwrap();

        assert!(db.recent_statuses(5).unwrap().is_empty());

        let first = db.insert_status("first", None).unwrap();
        let second = db.insert_status("second", None).unwrap();
        assert_ne!(first.id, second.id);

        // Only the latest one with a limit of 1
        let recent = db.recent_statuses(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].text, "second");

        // Oldest first
        let recent = db.recent_statuses(10).unwrap();
        let texts: Vec<_> = recent.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);

        assert_eq!(db.clear_statuses().unwrap(), 2);
        assert!(db.recent_statuses(10).unwrap().is_empty());
    }

    #[test]
    fn test_thread_reply_is_stored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let db = Database::open_path(&path).unwrap();

        let first = db.insert_status("first", None).unwrap();
        let reply = db.insert_status("second", Some(first.id)).unwrap();
        assert_eq!(reply.in_reply_to, Some(first.id));

        let recent = db.recent_statuses(10).unwrap();
        assert_eq!(recent[0].in_reply_to, None);
        assert_eq!(recent[1].in_reply_to, Some(first.id));
    }

    #[test]
    fn test_adds_reply_column_to_old_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE statuses (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    text TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
                INSERT INTO statuses (text, created_at) VALUES ('old', '2024-01-01T00:00:00+00:00');",
            )
            .unwrap();
        }

        let db = Database::open_path(&path).unwrap();
        let recent = db.recent_statuses(10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].in_reply_to, None);

        let reply = db.insert_status("new", Some(recent[0].id)).unwrap();
        assert_eq!(db.recent_statuses(1).unwrap(), vec![reply]);
    }
}
