use chrono::{Duration, Utc};
use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::config::{save_session, Session};
use crate::cli::utils::{output_success, read_password};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Login to server and store the token")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show current user information")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    server: &str,
    session: Session,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register { username, password } => {
            let password = read_password(password)?;
            let client = ApiClient::new(server, None)?;
            let account = client.register(&username, &password).await?;

            output_success(
                &output_format,
                &format!("Registered user '{}' (id {})", account.username, account.id),
                Some(json!({ "user": account })),
            )
        }
        AuthCommands::Login { username, password } => {
            let password = read_password(password)?;
            let client = ApiClient::new(server, None)?;
            let grant = client.login(&username, &password).await?;

            save_session(&Session {
                server: Some(server.to_string()),
                username: Some(grant.user.username.clone()),
                token: Some(grant.token),
                expires_at: Some(Utc::now() + Duration::seconds(grant.expires_in)),
            })?;

            output_success(
                &output_format,
                &format!("Logged in as '{}' on {}", grant.user.username, server),
                Some(json!({ "user": grant.user, "expires_in": grant.expires_in })),
            )
        }
        AuthCommands::Logout => {
            save_session(&Session {
                server: session.server,
                ..Session::default()
            })?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            let token = session
                .active_token()
                .ok_or_else(|| anyhow::anyhow!("Not logged in; run `todo auth login <username>`"))?;
            let client = ApiClient::new(server, Some(token.to_string()))?;
            let me = client.whoami().await?;

            let username = me["username"].as_str().unwrap_or("?").to_string();
            output_success(&output_format, &format!("Logged in as '{}'", username), Some(json!({ "user": me })))
        }
    }
}
