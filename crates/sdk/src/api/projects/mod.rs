use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use traintrack_core::progress::types::{ProgressEntry, ProgressSubmission};
use traintrack_core::project::types::{CreateMiniProject, MiniProject, ProjectFilter};

use crate::api::http::HttpClient;
use crate::api::types::ApiResult;

/// Mini-project CRUD plus the per-trainee progress and comment operations
/// nested under a project.
#[derive(Clone)]
pub struct ProjectsApi {
    client: Arc<HttpClient>,
}

impl ProjectsApi {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Dashboard listing, optionally narrowed by priority and/or due date.
    pub async fn list(&self, filter: Option<&ProjectFilter>) -> ApiResult<Vec<MiniProject>> {
        self.client.get_with_query("mini-projects/", filter).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<MiniProject> {
        self.client.get(&format!("mini-projects/{id}/")).await
    }

    pub async fn create(&self, project: &CreateMiniProject) -> ApiResult<MiniProject> {
        self.client.post("mini-projects/", project).await
    }

    /// Full replacement; the edit form submits the same shape as create.
    pub async fn update(&self, id: i64, project: &CreateMiniProject) -> ApiResult<MiniProject> {
        self.client.put(&format!("mini-projects/{id}/"), project).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete_status(&format!("mini-projects/{id}/")).await
    }

    /// Trainer comment on one trainee's progress entry.
    pub async fn comment(&self, id: i64, trainee: i64, comment: &str) -> ApiResult<()> {
        #[derive(Serialize)]
        struct CommentRequest<'a> {
            trainee: i64,
            comment: &'a str,
        }

        self.client
            .post_status(&format!("mini-projects/{id}/comment/"), &CommentRequest { trainee, comment })
            .await
    }

    /// The calling trainee's own progress entry for this project.
    pub async fn my_progress(&self, id: i64) -> ApiResult<ProgressEntry> {
        self.client.get(&format!("mini-projects/{id}/my_progress/")).await
    }

    /// Partial update of the calling trainee's progress. Sent as multipart
    /// form data so the report can travel as a file part; the form is
    /// rebuilt from owned bytes if the request is replayed after a refresh.
    pub async fn submit_progress(
        &self,
        id: i64,
        submission: &ProgressSubmission,
    ) -> ApiResult<ProgressEntry> {
        let endpoint = format!("mini-projects/{id}/my_progress/");
        self.client.patch_multipart(&endpoint, || progress_form(submission)).await
    }
}

fn progress_form(submission: &ProgressSubmission) -> Form {
    let mut form = Form::new();
    if let Some(status) = submission.status {
        form = form.text("status", status.to_string());
    }
    if let Some(link) = &submission.deployment_link {
        form = form.text("deployment_link", link.clone());
    }
    if let Some(link) = &submission.github_link {
        form = form.text("github_link", link.clone());
    }
    if let Some(completed_at) = submission.completed_at {
        form = form.text("completed_at", completed_at.to_rfc3339());
    }
    if let Some(report) = &submission.report {
        form = form
            .part("report", Part::bytes(report.bytes.clone()).file_name(report.file_name.clone()));
    }
    form
}
