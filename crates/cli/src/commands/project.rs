use chrono::NaiveDate;
use clap::{Args, Subcommand};
use dialoguer::{Confirm, Input, MultiSelect, Select};
use traintrack::{Client, CreateMiniProject, MiniProject, Priority, ProjectFilter, User};

use crate::commands::error::ProjectError;
use crate::console::{print_success_message, print_table, print_warn_message};

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// List projects, optionally filtered
    List(ListArgs),
    /// Show one project with per-trainee progress and comments
    Show {
        /// The project id
        id: i64,
    },
    /// Create a project interactively
    Create,
    /// Edit an existing project
    Edit {
        /// The project id
        id: i64,
    },
    /// Delete a project
    Delete {
        /// The project id
        id: i64,
        /// Skip the confirmation prompt
        #[clap(long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Only projects with this priority (low, medium, high)
    #[clap(long)]
    pub priority: Option<Priority>,

    /// Only projects due on this date (YYYY-MM-DD)
    #[clap(long)]
    pub due_date: Option<NaiveDate>,
}

pub async fn handle_project_command(
    client: &Client,
    command: &ProjectCommand,
) -> Result<(), ProjectError> {
    match command {
        ProjectCommand::List(args) => handle_list(client, args).await,
        ProjectCommand::Show { id } => handle_show(client, *id).await,
        ProjectCommand::Create => handle_create(client).await,
        ProjectCommand::Edit { id } => handle_edit(client, *id).await,
        ProjectCommand::Delete { id, yes } => handle_delete(client, *id, *yes).await,
    }
}

async fn handle_list(client: &Client, args: &ListArgs) -> Result<(), ProjectError> {
    let filter = ProjectFilter { priority: args.priority, due_date: args.due_date };
    let filter = if filter.is_empty() { None } else { Some(filter) };

    let projects = client.projects.list(filter.as_ref()).await?;
    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    let rows = projects
        .iter()
        .map(|project| {
            vec![
                project.id.to_string(),
                project.title.clone(),
                project.priority.to_string(),
                project.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                assignee_summary(project),
                project.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();

    let title = format!("{} projects:", projects.len());
    print_table(
        vec!["Id", "Title", "Priority", "Due", "Assigned", "Created"],
        rows,
        Some(&title),
    );
    Ok(())
}

fn assignee_summary(project: &MiniProject) -> String {
    if project.assigned_to_details.is_empty() {
        return "-".to_string();
    }
    project
        .assigned_to_details
        .iter()
        .map(|user| user.username.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

async fn handle_show(client: &Client, id: i64) -> Result<(), ProjectError> {
    let project = client.projects.get(id).await?;

    println!("#{} {}  [{}]", project.id, project.title, project.priority);
    if !project.description.is_empty() {
        println!("{}", project.description);
    }
    println!("given: {}", project.created_at.format("%Y-%m-%d"));
    match project.due_date {
        Some(due) => println!("due:   {}", due),
        None => println!("due:   -"),
    }
    println!("assigned: {}", assignee_summary(&project));

    if project.progress_entries.is_empty() {
        println!("\nNo progress submitted yet.");
        return Ok(());
    }

    for entry in &project.progress_entries {
        let trainee =
            entry.trainee_username.clone().unwrap_or_else(|| format!("trainee #{}", entry.trainee));
        println!("\n{} - {}", trainee, entry.status);
        if let Some(link) = &entry.deployment_link {
            println!("  deployment: {}", link);
        }
        if let Some(link) = &entry.github_link {
            println!("  github:     {}", link);
        }
        if let Some(report) = &entry.report {
            println!("  report:     {}", report);
        }
        if let Some(completed_at) = entry.completed_at {
            println!("  completed:  {}", completed_at.format("%Y-%m-%d %H:%M"));
        }
        for comment in &entry.comments {
            println!(
                "  > {} ({}): {}",
                comment.author_username.as_deref().unwrap_or("trainer"),
                comment.created_at.format("%Y-%m-%d"),
                comment.comment
            );
        }
    }
    Ok(())
}

/// Interactive form shared by create and edit; `existing` pre-fills prompts.
async fn prompt_project_form(
    client: &Client,
    existing: Option<&MiniProject>,
) -> Result<CreateMiniProject, ProjectError> {
    let mut title_prompt = Input::new().with_prompt("Title");
    if let Some(project) = existing {
        title_prompt = title_prompt.default(project.title.clone());
    }
    let title: String = title_prompt.interact_text()?;

    let mut description_prompt = Input::new().with_prompt("Description").allow_empty(true);
    if let Some(project) = existing {
        description_prompt = description_prompt.default(project.description.clone());
    }
    let description: String = description_prompt.interact_text()?;

    let priorities = [Priority::Low, Priority::Medium, Priority::High];
    let default_priority = existing
        .map(|project| priorities.iter().position(|p| *p == project.priority).unwrap_or(1))
        .unwrap_or(1);
    let priority_index = Select::new()
        .with_prompt("Priority")
        .items(&["low", "medium", "high"])
        .default(default_priority)
        .interact()?;
    let priority = priorities[priority_index];

    let mut due_prompt =
        Input::new().with_prompt("Due date (YYYY-MM-DD, empty for none)").allow_empty(true);
    if let Some(due) = existing.and_then(|project| project.due_date) {
        due_prompt = due_prompt.default(due.to_string());
    }
    let due_raw: String = due_prompt.interact_text()?;
    let due_date = match due_raw.trim() {
        "" => None,
        value => Some(
            value
                .parse::<NaiveDate>()
                .map_err(|_| ProjectError::InvalidDate { value: value.to_string() })?,
        ),
    };

    let users = client.users.list().await?;
    let assigned_to = prompt_assignees(&users, existing)?;

    Ok(CreateMiniProject {
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        priority,
        due_date,
        assigned_to,
    })
}

fn prompt_assignees(
    users: &[User],
    existing: Option<&MiniProject>,
) -> Result<Vec<i64>, ProjectError> {
    if users.is_empty() {
        print_warn_message("No users available to assign.");
        return Ok(Vec::new());
    }

    let labels: Vec<String> =
        users.iter().map(|user| format!("{} ({})", user.username, user.role)).collect();
    let checked: Vec<bool> = users
        .iter()
        .map(|user| {
            existing.map(|project| project.assigned_to.contains(&user.id)).unwrap_or(false)
        })
        .collect();

    let picked = MultiSelect::new()
        .with_prompt("Assign trainees (space to toggle, enter to confirm)")
        .items(&labels)
        .defaults(&checked)
        .interact()?;

    Ok(picked.into_iter().map(|index| users[index].id).collect())
}

async fn handle_create(client: &Client) -> Result<(), ProjectError> {
    let payload = prompt_project_form(client, None).await?;
    let project = client.projects.create(&payload).await?;
    print_success_message(&format!("Project #{} '{}' created.", project.id, project.title));
    Ok(())
}

async fn handle_edit(client: &Client, id: i64) -> Result<(), ProjectError> {
    let existing = client.projects.get(id).await?;
    let payload = prompt_project_form(client, Some(&existing)).await?;
    let project = client.projects.update(id, &payload).await?;
    print_success_message(&format!("Project #{} '{}' updated.", project.id, project.title));
    Ok(())
}

async fn handle_delete(client: &Client, id: i64, yes: bool) -> Result<(), ProjectError> {
    if !yes {
        let project = client.projects.get(id).await?;
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete project '{}'? This cannot be undone", project.title))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    client.projects.delete(id).await?;
    print_success_message("Project deleted.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::sync::Arc;
    use traintrack::{CreateClientConfig, MemoryTokenStore};

    fn client_for(server: &MockServer) -> Client {
        Client::with_storage(
            CreateClientConfig { server_url: server.base_url(), timeout: None },
            Arc::new(MemoryTokenStore::default()),
        )
        .expect("client builds")
    }

    #[tokio::test]
    async fn list_passes_filters_through() {
        let server = MockServer::start_async().await;
        let listing = server.mock(|when, then| {
            when.method(GET).path("/mini-projects/").query_param("priority", "high");
            then.status(200).json_body(json!([{
                "id": 2,
                "title": "CLI exercise",
                "priority": "high",
                "created_at": "2025-04-01T08:00:00Z",
                "assigned_to_details": [
                    {"id": 9, "username": "bob", "role": "trainee"}
                ]
            }]));
        });

        let client = client_for(&server);
        let args = ListArgs { priority: Some(Priority::High), due_date: None };
        handle_list(&client, &args).await.expect("listing succeeds");
        listing.assert();
    }

    #[tokio::test]
    async fn delete_with_yes_skips_the_prompt() {
        let server = MockServer::start_async().await;
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/mini-projects/2/");
            then.status(204);
        });

        let client = client_for(&server);
        handle_delete(&client, 2, true).await.expect("delete succeeds");
        delete.assert();
    }

    #[tokio::test]
    async fn show_renders_progress_entries() {
        let server = MockServer::start_async().await;
        let detail = server.mock(|when, then| {
            when.method(GET).path("/mini-projects/2/");
            then.status(200).json_body(json!({
                "id": 2,
                "title": "CLI exercise",
                "description": "Build a small CLI",
                "priority": "medium",
                "created_at": "2025-04-01T08:00:00Z",
                "progress_entries": [{
                    "id": 5,
                    "trainee": 9,
                    "trainee_username": "bob",
                    "status": "inprogress",
                    "github_link": "https://github.com/bob/cli",
                    "comments": [{
                        "id": 1,
                        "author_username": "alice",
                        "comment": "Looking good",
                        "created_at": "2025-04-03T10:00:00Z"
                    }]
                }]
            }));
        });

        let client = client_for(&server);
        handle_show(&client, 2).await.expect("show succeeds");
        detail.assert();
    }
}
