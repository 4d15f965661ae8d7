use dialoguer::{Input, Password};
use traintrack::Client;

use crate::commands::error::AuthError;
use crate::console::{print_success_message, print_warn_message};
use crate::credentials::FileTokenStore;

/// Prompts for credentials, exchanges them for a token pair and persists
/// the session alongside the API URL it belongs to.
pub async fn handle_login(
    client: &Client,
    store: &FileTokenStore,
    api_url: &str,
) -> Result<(), AuthError> {
    let username: String = Input::new().with_prompt("Username or email").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;

    client.auth.login(username.trim(), &password).await?;
    store.save_api_url(api_url);

    let user = client.auth.current_user().await?;
    print_success_message(&format!("Logged in as {} ({})", user.username, user.role));
    Ok(())
}

pub fn handle_logout(client: &Client) {
    client.auth.logout();
    print_success_message("Logged out. The stored session has been removed.");
}

pub async fn handle_whoami(client: &Client) -> Result<(), AuthError> {
    match client.restore_session().await? {
        Some(user) => {
            println!("{} (id {})", user.username, user.id);
            println!("role:  {}", user.role);
            if let Some(email) = &user.email {
                println!("email: {}", email);
            }
        }
        None => print_warn_message("Not logged in. Run `traintrack login` first."),
    }
    Ok(())
}
