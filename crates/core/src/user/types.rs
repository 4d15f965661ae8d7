use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Trainer,
    Trainee,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Trainer => f.write_str("trainer"),
            UserRole::Trainee => f.write_str("trainee"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown role '{0}', expected trainer or trainee")]
pub struct InvalidUserRole(String);

impl FromStr for UserRole {
    type Err = InvalidUserRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "trainer" => Ok(UserRole::Trainer),
            "trainee" => Ok(UserRole::Trainee),
            other => Err(InvalidUserRole(other.to_string())),
        }
    }
}

/// Authenticated principal as returned by the current-user endpoint, also
/// embedded in project listings as assignee details.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: UserRole,
}

impl User {
    pub fn is_trainer(&self) -> bool {
        self.role == UserRole::Trainer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_lowercase_json() {
        let user: User = serde_json::from_str(
            r#"{"id": 3, "username": "alice", "email": null, "role": "trainer"}"#,
        )
        .unwrap();
        assert!(user.is_trainer());
        assert_eq!(serde_json::to_value(user.role).unwrap(), "trainer");
    }

    #[test]
    fn role_parse_rejects_unknown() {
        assert!("admin".parse::<UserRole>().is_err());
        assert_eq!("trainee".parse::<UserRole>().unwrap(), UserRole::Trainee);
    }
}
