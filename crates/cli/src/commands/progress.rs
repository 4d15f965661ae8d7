use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use traintrack::{Client, ProgressEntry, ProgressStatus, ProgressSubmission, ReportUpload};

use crate::commands::error::ProgressError;
use crate::console::print_success_message;

#[derive(Subcommand)]
pub enum ProgressCommand {
    /// Show your progress entry for a project
    Show {
        /// The project id
        project_id: i64,
    },
    /// Submit progress for a project
    Submit(SubmitArgs),
}

#[derive(Args)]
pub struct SubmitArgs {
    /// The project id
    pub project_id: i64,

    /// New status (todo, inprogress, complete)
    #[clap(long)]
    pub status: Option<ProgressStatus>,

    /// Link to the deployed project
    #[clap(long)]
    pub deployment_link: Option<String>,

    /// Link to the GitHub repository
    #[clap(long)]
    pub github_link: Option<String>,

    /// Completion timestamp, RFC 3339 (e.g. 2025-06-01T17:30:00Z)
    #[clap(long)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Path to a report file to upload
    #[clap(long)]
    pub report: Option<PathBuf>,
}

pub async fn handle_progress_command(
    client: &Client,
    command: &ProgressCommand,
) -> Result<(), ProgressError> {
    match command {
        ProgressCommand::Show { project_id } => handle_show(client, *project_id).await,
        ProgressCommand::Submit(args) => handle_submit(client, args).await,
    }
}

async fn handle_show(client: &Client, project_id: i64) -> Result<(), ProgressError> {
    let entry = client.projects.my_progress(project_id).await?;
    print_entry(&entry);
    Ok(())
}

async fn handle_submit(client: &Client, args: &SubmitArgs) -> Result<(), ProgressError> {
    let report = match &args.report {
        Some(path) => Some(read_report(path)?),
        None => None,
    };

    let submission = ProgressSubmission {
        status: args.status,
        deployment_link: args.deployment_link.clone(),
        github_link: args.github_link.clone(),
        completed_at: args.completed_at,
        report,
    };

    let entry = client.projects.submit_progress(args.project_id, &submission).await?;
    print_success_message("Progress saved.");
    print_entry(&entry);
    Ok(())
}

fn read_report(path: &PathBuf) -> Result<ReportUpload, ProgressError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| ProgressError::ReportFileName(path.display().to_string()))?;

    let bytes = fs::read(path)
        .map_err(|source| ProgressError::ReportFile { path: path.display().to_string(), source })?;

    Ok(ReportUpload { file_name, bytes })
}

fn print_entry(entry: &ProgressEntry) {
    println!("status:     {}", entry.status);
    println!("deployment: {}", entry.deployment_link.as_deref().unwrap_or("-"));
    println!("github:     {}", entry.github_link.as_deref().unwrap_or("-"));
    println!("report:     {}", entry.report.as_deref().unwrap_or("-"));
    match entry.completed_at {
        Some(completed_at) => println!("completed:  {}", completed_at.format("%Y-%m-%d %H:%M")),
        None => println!("completed:  -"),
    }
    for comment in &entry.comments {
        println!(
            "> {} ({}): {}",
            comment.author_username.as_deref().unwrap_or("trainer"),
            comment.created_at.format("%Y-%m-%d"),
            comment.comment
        );
    }
}
