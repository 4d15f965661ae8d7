use clap::Args;
use traintrack::Client;

use crate::commands::error::CommentError;
use crate::console::print_success_message;

#[derive(Args)]
pub struct CommentArgs {
    /// The project id
    pub project_id: i64,

    /// Id of the trainee whose progress entry the comment is for
    #[clap(long)]
    pub trainee: i64,

    /// The comment text
    #[clap(long)]
    pub message: String,
}

pub async fn handle_comment(client: &Client, args: &CommentArgs) -> Result<(), CommentError> {
    client.projects.comment(args.project_id, args.trainee, args.message.trim()).await?;
    print_success_message("Comment posted.");
    Ok(())
}
