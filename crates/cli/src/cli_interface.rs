use clap::{Parser, Subcommand};

use crate::commands::{comment::CommentArgs, progress::ProgressCommand, project::ProjectCommand};

#[derive(Parser)]
#[command(author, version, about = "Track trainee mini-projects from the command line")]
#[command(propagate_version = true)]
pub struct Cli {
    /// API root URL, e.g. http://localhost:8000/api
    #[clap(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login,
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Create, list, edit and delete mini-projects
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    /// View or submit your own progress on a project
    Progress {
        #[command(subcommand)]
        command: ProgressCommand,
    },
    /// Comment on a trainee's progress entry
    Comment(CommentArgs),
}
