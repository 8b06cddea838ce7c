//! User account management commands

use clap::Subcommand;
use mathesis_core::error::{MathesisError, Result};
use mathesis_core::storage::LearningStore;
use mathesis_core::types::NewUser;
use tracing::debug;

use super::helpers::{get_db_path, open_store};

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user account
    Add {
        /// Username (must be unique)
        #[arg(long)]
        username: String,

        /// Email address (must be unique when given)
        #[arg(long)]
        email: Option<String>,

        /// Password (required unless --guest)
        #[arg(long, default_value = "")]
        password: String,

        /// Create a guest account without credentials
        #[arg(long)]
        guest: bool,
    },

    /// List registered accounts
    List,
}

/// Handle user management command
pub async fn handle(action: UserAction, global_db_path: Option<String>) -> Result<()> {
    let db_path = get_db_path(global_db_path)?;
    debug!("Using database: {}", db_path);

    match action {
        UserAction::Add {
            username,
            email,
            password,
            guest,
        } => {
            if !guest && password.is_empty() {
                return Err(MathesisError::Validation(
                    "--password is required unless --guest is set".to_string(),
                ));
            }

            let store = open_store(&db_path, true).await?;
            let user = store
                .create_user(&NewUser {
                    username,
                    email,
                    password,
                    is_guest: guest,
                })
                .await?;

            println!("✓ User created");
            println!("  ID:       {}", user.id);
            println!("  Username: {}", user.username);
            if let Some(email) = &user.email {
                println!("  Email:    {}", email);
            }
            if user.is_guest {
                println!("  Type:     guest");
            }

            Ok(())
        }
        UserAction::List => {
            let store = open_store(&db_path, false).await?;
            let users = store.list_users().await?;

            if users.is_empty() {
                println!("No users registered yet.");
                return Ok(());
            }

            println!("Registered users ({}):", users.len());
            println!();
            for user in users {
                let kind = if user.is_guest { "guest" } else { "registered" };
                println!(
                    "{:>5}  {:<20} {:<30} {:<12} {}",
                    user.id,
                    user.username,
                    user.email.as_deref().unwrap_or("-"),
                    kind,
                    user.created_at.format("%Y-%m-%d %H:%M")
                );
            }

            Ok(())
        }
    }
}
