use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Todo,
    InProgress,
    Complete,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::Todo => f.write_str("todo"),
            ProgressStatus::InProgress => f.write_str("inprogress"),
            ProgressStatus::Complete => f.write_str("complete"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown status '{0}', expected todo, inprogress or complete")]
pub struct InvalidProgressStatus(String);

impl FromStr for ProgressStatus {
    type Err = InvalidProgressStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "todo" => Ok(ProgressStatus::Todo),
            "inprogress" => Ok(ProgressStatus::InProgress),
            "complete" => Ok(ProgressStatus::Complete),
            other => Err(InvalidProgressStatus(other.to_string())),
        }
    }
}

/// One trainee's progress on a project: status, submission links, optional
/// uploaded report (served back as a URL) and trainer comments.
#[derive(Clone, Debug, Deserialize)]
pub struct ProgressEntry {
    pub id: i64,
    pub trainee: i64,
    #[serde(default)]
    pub trainee_username: Option<String>,
    pub status: ProgressStatus,
    #[serde(default)]
    pub deployment_link: Option<String>,
    #[serde(default)]
    pub github_link: Option<String>,
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub author_username: Option<String>,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Fields a trainee submits for their own progress entry. Sent as multipart
/// form data because the report travels as a file part.
#[derive(Clone, Debug, Default)]
pub struct ProgressSubmission {
    pub status: Option<ProgressStatus>,
    pub deployment_link: Option<String>,
    pub github_link: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub report: Option<ReportUpload>,
}

/// An uploaded report file, held as owned bytes so the request body can be
/// rebuilt if the submission has to be redispatched after a token refresh.
#[derive(Clone, Debug)]
pub struct ReportUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
