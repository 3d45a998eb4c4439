//! mycrud command-line entry point

use clap::{Parser, Subcommand};
use mycrud::{ConnectionConfig, Database, ProcessEnv, TrustRegistry};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Minimal CRUD client for the `user` table over mutually authenticated TLS.
///
/// Connection settings come from DB_USER, DB_PASS, DB_ADDR, DB_NAME and either
/// DB_SKIP_TLS or DB_CA_CERT_PATH, DB_CLIENT_CERT_PATH and DB_CLIENT_KEY_PATH.
#[derive(Parser, Debug)]
#[command(name = "mycrud", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all users by creation time (default)
    List {
        /// Print one JSON array instead of one line per user
        #[arg(long)]
        json: bool,
    },
    /// Insert a user
    Add {
        /// User name
        name: String,
    },
    /// Rename users matching OLD
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
    /// Delete users matching NAME
    Delete {
        /// User name
        name: String,
    },
    /// Create the user table and its UUID trigger if missing
    InitSchema,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    let cli = Cli::parse();
    match run(cli.command.unwrap_or(Command::List { json: false })).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(category = e.category(), "{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> mycrud::Result<()> {
    let mut registry = TrustRegistry::new();
    let config = ConnectionConfig::from_env(&ProcessEnv, &mut registry)?;
    tracing::debug!(?config, "resolved configuration");

    let mut db = Database::open(&config, &registry).await?;

    match command {
        Command::List { json } => {
            let users = db.users().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else {
                for user in &users {
                    println!("{}", user);
                }
            }
            tracing::info!("connection to db successful");
        }
        Command::Add { name } => {
            let n = db.add_user(&name).await?;
            tracing::info!(name = %name, rows = n, "user added");
        }
        Command::Rename { old, new } => {
            let n = db.rename_user(&old, &new).await?;
            if n == 0 {
                tracing::warn!(name = %old, "no user with that name");
            } else {
                tracing::info!(old = %old, new = %new, rows = n, "user renamed");
            }
        }
        Command::Delete { name } => {
            let n = db.delete_user(&name).await?;
            if n == 0 {
                tracing::warn!(name = %name, "no user with that name");
            } else {
                tracing::info!(name = %name, rows = n, "user deleted");
            }
        }
        Command::InitSchema => db.init_schema().await?,
    }

    db.close().await
}
