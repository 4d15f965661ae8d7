use std::env;
use std::sync::Arc;

use clap::Parser;
use traintrack::{Client, CreateClientConfig};
use traintrack_core::{load_env_from_project_path, setup_info_logger};

mod cli_interface;
mod commands;
mod console;
mod credentials;
mod error;

use crate::cli_interface::{Cli, Commands};
use crate::commands::{auth, comment, progress, project};
use crate::console::{print_error_message, print_warn_message};
use crate::credentials::FileTokenStore;
use crate::error::CliError;

fn resolve_api_url(flag: Option<&String>, store: &FileTokenStore) -> Result<String, CliError> {
    if let Some(url) = flag {
        return Ok(url.clone());
    }
    if let Ok(url) = env::var("TRAINTRACK_API_URL") {
        if !url.is_empty() {
            return Ok(url);
        }
    }
    if let Some(url) = store.api_url() {
        return Ok(url);
    }
    Err(CliError::Config(
        "No API URL configured. Pass --api-url, set TRAINTRACK_API_URL, or log in once with \
         `traintrack --api-url <url> login`."
            .to_string(),
    ))
}

async fn dispatch(
    cli: &Cli,
    client: &Client,
    store: &FileTokenStore,
    api_url: &str,
) -> Result<(), CliError> {
    match &cli.command {
        Commands::Login => auth::handle_login(client, store, api_url).await?,
        Commands::Logout => auth::handle_logout(client),
        Commands::Whoami => auth::handle_whoami(client).await?,
        Commands::Project { command } => project::handle_project_command(client, command).await?,
        Commands::Progress { command } => {
            progress::handle_progress_command(client, command).await?
        }
        Commands::Comment(args) => comment::handle_comment(client, args).await?,
    }
    Ok(())
}

async fn run_cli(cli: &Cli) -> i32 {
    let store = match FileTokenStore::open_default() {
        Ok(store) => store,
        Err(err) => {
            print_error_message(&CliError::from(err).to_string());
            return 1;
        }
    };

    let api_url = match resolve_api_url(cli.api_url.as_ref(), &store) {
        Ok(api_url) => api_url,
        Err(err) => {
            print_error_message(&err.to_string());
            return 1;
        }
    };

    let client = match Client::with_storage(
        CreateClientConfig { server_url: api_url.clone(), timeout: None },
        Arc::new(store.clone()),
    ) {
        Ok(client) => client,
        Err(err) => {
            print_error_message(&CliError::from(err).to_string());
            return 1;
        }
    };

    match dispatch(cli, &client, &store, &api_url).await {
        Ok(()) => 0,
        Err(err) => {
            print_error_message(&err.to_string());
            if client.logged_out() {
                print_warn_message("Session expired. Run `traintrack login` to start a new one.");
            }
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_info_logger();
    if let Ok(current_dir) = env::current_dir() {
        load_env_from_project_path(&current_dir);
    }

    std::process::exit(run_cli(&cli).await);
}
