pub mod client;
pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo CLI - Command-line client for the Todo API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "TODO_API_URL", help = "API base URL (defaults to the logged-in server)")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Account registration and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(flatten)]
    Todo(commands::todo::TodoCommands),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let session = config::load_session()?;
    let server = cli
        .server
        .clone()
        .or_else(|| session.server.clone())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &server, session, output_format).await,
        Commands::Todo(cmd) => commands::todo::handle(cmd, &server, session, output_format).await,
    }
}
