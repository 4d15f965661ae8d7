use traintrack::{Client, CreateClientConfig, ProjectFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new(CreateClientConfig {
        server_url: "http://localhost:8000/api".to_string(),
        timeout: None,
    })?;

    client.auth.login("alice", "pw").await?;
    let me = client.auth.current_user().await?;
    println!("logged in as {} ({})", me.username, me.role);

    // All calls below reuse the stored session; an expired access token is
    // refreshed behind the scenes.
    let projects = client.projects.list(Some(&ProjectFilter::default())).await?;
    println!("{} projects assigned", projects.len());

    for project in projects {
        println!("#{} {} [{}]", project.id, project.title, project.priority);
        for entry in project.progress_entries {
            println!(
                "    {} -> {}",
                entry.trainee_username.as_deref().unwrap_or("trainee"),
                entry.status
            );
        }
    }

    Ok(())
}
