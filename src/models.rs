use chrono::{DateTime, Utc};
use solana_sdk::pubkey::Pubkey;

/// A single guestbook entry as stored in the base account
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    /// Seconds since the unix epoch, as recorded by the program
    pub timestamp: i64,
    pub author: Pubkey,
}

impl Comment {
    pub fn new(text: impl Into<String>, timestamp: i64, author: Pubkey) -> Self {
        Comment {
            text: text.into(),
            timestamp,
            author,
        }
    }

    /// Human readable age relative to `now`, e.g. "5 minutes ago"
    pub fn age(&self, now: DateTime<Utc>) -> String {
        match DateTime::<Utc>::from_timestamp(self.timestamp, 0) {
            Some(created) => relative_time(created, now),
            None => String::from("some time ago"),
        }
    }
}

/// Connected wallet session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub connected_address: Option<Pubkey>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.connected_address.is_some()
    }
}

/// The comment being typed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    pub cursor: usize,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

/// Coarse "time ago" wording, close to what moment.js prints
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    let future = secs < 0;
    let secs = secs.unsigned_abs();

    let minutes = secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    let phrase = if secs < 45 {
        String::from("a few seconds")
    } else if secs < 90 {
        String::from("a minute")
    } else if minutes < 45 {
        format!("{} minutes", minutes.max(2))
    } else if minutes < 90 {
        String::from("an hour")
    } else if hours < 22 {
        format!("{} hours", hours.max(2))
    } else if hours < 36 {
        String::from("a day")
    } else if days < 26 {
        format!("{} days", days.max(2))
    } else if days < 45 {
        String::from("a month")
    } else if days < 320 {
        format!("{} months", (days / 30).max(2))
    } else if days < 548 {
        String::from("a year")
    } else {
        format!("{} years", (days / 365).max(2))
    };

    if future {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(relative_time(now - Duration::seconds(10), now), "a few seconds ago");
        assert_eq!(relative_time(now - Duration::seconds(60), now), "a minute ago");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(relative_time(now - Duration::days(1), now), "a day ago");
        assert_eq!(relative_time(now - Duration::days(10), now), "10 days ago");
        assert_eq!(relative_time(now - Duration::days(800), now), "2 years ago");
        assert_eq!(relative_time(now + Duration::minutes(5), now), "in 5 minutes");
    }

    #[test]
    fn test_comment_age_uses_epoch_seconds() {
        let now = DateTime::<Utc>::from_timestamp(1_000_000, 0).unwrap();
        let comment = Comment::new("hi", 1_000_000 - 120, Pubkey::default());
        assert_eq!(comment.age(now), "2 minutes ago");
    }

    #[test]
    fn test_draft_clear_resets_cursor() {
        let mut draft = Draft {
            text: String::from("hello"),
            cursor: 5,
        };
        draft.clear();
        assert!(draft.is_empty());
        assert_eq!(draft.cursor, 0);
    }
}
