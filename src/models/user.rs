use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// The persisted users document is a JSON object keyed by username, so the
// username itself lives outside the record.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub email: String,
    pub password_hash: String,
    pub favorite_beach: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

pub type UserMap = BTreeMap<String, User>;

/// Username of the earliest-registered user. Accounts are never deleted, so
/// the smallest `created_at` identifies the first entry ever written to the
/// collection; ties break on username to stay deterministic.
pub fn first_registered(users: &UserMap) -> Option<&str> {
    users
        .iter()
        .min_by_key(|(name, user)| (user.created_at, *name))
        .map(|(name, _)| name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user_created_at(ts: i64) -> User {
        User {
            email: format!("u{}@example.com", ts),
            password_hash: "hash".to_string(),
            favorite_beach: "sandy".to_string(),
            created_at: Utc.timestamp_opt(ts, 0).unwrap(),
            last_login: None,
        }
    }

    #[test]
    fn test_first_registered_empty() {
        let users = UserMap::new();
        assert_eq!(first_registered(&users), None);
    }

    #[test]
    fn test_first_registered_orders_by_creation_time() {
        let mut users = UserMap::new();
        // "zoe" registered before "alice"; map iteration order is alphabetical
        // but registration order must win.
        users.insert("alice".to_string(), user_created_at(200));
        users.insert("zoe".to_string(), user_created_at(100));
        assert_eq!(first_registered(&users), Some("zoe"));
    }

    #[test]
    fn test_first_registered_ties_break_on_username() {
        let mut users = UserMap::new();
        users.insert("bob".to_string(), user_created_at(100));
        users.insert("alice".to_string(), user_created_at(100));
        assert_eq!(first_registered(&users), Some("alice"));
    }
}
