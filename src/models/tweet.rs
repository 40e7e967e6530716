//! Posted status model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A status that has been posted successfully
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    /// Server-assigned ID
    pub id: i64,
    /// Status text as posted
    pub text: String,
    /// When the status was created
    pub created_at: DateTime<Utc>,
    /// Status this one continues, when posted as a thread
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<i64>,
}

impl Tweet {
    /// Create a new status value
    pub fn new(id: i64, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            created_at,
            in_reply_to: None,
        }
    }

    /// Mark this status as continuing `parent`
    pub fn replying_to(mut self, parent: Option<i64>) -> Self {
        self.in_reply_to = parent;
        self
    }

    /// Get relative time string (e.g., "5m", "2h", "3d")
    pub fn relative_time(&self) -> String {
        relative_time(self.created_at)
    }
}

/// Format how long ago `created_at` was (e.g., "5m", "2h", "3d")
pub fn relative_time(created_at: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(created_at);

    if duration.num_seconds() < 60 {
        format!("{}s", duration.num_seconds().max(0))
    } else if duration.num_minutes() < 60 {
        format!("{}m", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d", duration.num_days())
    } else {
        created_at.format("%b %d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_relative_time() {
        let tweet = Tweet::new(1, "hello", Utc::now() - Duration::minutes(5));
        assert_eq!(tweet.relative_time(), "5m");

        let tweet = Tweet::new(2, "hello", Utc::now() - Duration::hours(3));
        assert_eq!(tweet.relative_time(), "3h");
    }

    #[test]
    fn test_reply_is_omitted_from_json_when_absent() {
        let tweet = Tweet::new(1, "hello", Utc::now());
        let json = serde_json::to_value(&tweet).unwrap();
        assert!(json.get("in_reply_to").is_none());

        let reply = Tweet::new(2, "again", Utc::now()).replying_to(Some(1));
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["in_reply_to"], 1);
        assert_eq!(serde_json::from_value::<Tweet>(json).unwrap(), reply);
    }
}
