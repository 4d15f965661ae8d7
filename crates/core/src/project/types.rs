use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progress::types::ProgressEntry;
use crate::user::types::User;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => f.write_str("low"),
            Priority::Medium => f.write_str("medium"),
            Priority::High => f.write_str("high"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown priority '{0}', expected low, medium or high")]
pub struct InvalidPriority(String);

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(InvalidPriority(other.to_string())),
        }
    }
}

/// A trainee mini-project as returned by the API, with assignee details and
/// per-trainee progress entries embedded.
#[derive(Clone, Debug, Deserialize)]
pub struct MiniProject {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub assigned_to: Vec<i64>,
    #[serde(default)]
    pub assigned_to_details: Vec<User>,
    #[serde(default)]
    pub progress_entries: Vec<ProgressEntry>,
}

/// Payload for creating a project; the edit form submits the same shape as a
/// full replacement.
#[derive(Clone, Debug, Serialize)]
pub struct CreateMiniProject {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Vec<i64>,
}

/// Dashboard list filters, serialized into the query string. Unset fields
/// are omitted entirely rather than sent empty.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ProjectFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl ProjectFilter {
    pub fn is_empty(&self) -> bool {
        self.priority.is_none() && self.due_date.is_none()
    }
}
