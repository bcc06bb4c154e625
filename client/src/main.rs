//! FreelanceHub CLI - log in, inspect and end a session from the terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use freelancehub_client::api::HttpAuthClient;
use freelancehub_client::auth::{
    BootstrapOutcome, Field, LoginController, SubmitOutcome, bootstrap,
};
use freelancehub_client::config::ClientConfig;
use freelancehub_client::session::{self, FileStorage, SessionContext};

/// FreelanceHub - freelancer marketplace session client
#[derive(Parser, Debug)]
#[command(name = "freelancehub")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Backend URL (overrides FREELANCEHUB_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Restore the stored session and show where it lands
    Status,

    /// Forget the stored session
    Logout,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("freelancehub_client={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let api = Arc::new(
        HttpAuthClient::new(&config.api_url, config.http_timeout)
            .context("failed to create HTTP client")?,
    );
    let storage = Arc::new(FileStorage::new(&config.session_file));
    let session = SessionContext::new();

    match cli.command {
        Commands::Login { username, password } => {
            let controller = LoginController::new(api, storage, session)
                .with_reveal_delay(config.reveal_delay);
            controller.set_value(Field::Username, username);
            controller.set_value(Field::Password, password);

            match controller.submit().await {
                SubmitOutcome::Success { redirect, message } => {
                    println!("{message}");
                    println!("Dashboard: {redirect}");
                    Ok(())
                }
                SubmitOutcome::Invalid(errors) => {
                    for message in [errors.username, errors.password].into_iter().flatten() {
                        eprintln!("  {message}");
                    }
                    anyhow::bail!("invalid login details")
                }
                SubmitOutcome::Failed(error) => anyhow::bail!(error.user_message()),
                SubmitOutcome::Ignored => Ok(()),
            }
        }
        Commands::Status => {
            match bootstrap(api.as_ref(), storage.as_ref(), &session).await {
                BootstrapOutcome::Resume { redirect } => {
                    if let Some(current) = session.current() {
                        println!("Logged in as {} ({})", current.user_id, current.role);
                    }
                    println!("Dashboard: {redirect}");
                }
                BootstrapOutcome::ShowLogin => println!("Not logged in"),
            }
            Ok(())
        }
        Commands::Logout => {
            session::logout(&session, storage.as_ref())
                .with_context(|| format!("failed to clear {}", storage.path().display()))?;
            println!("Logged out");
            Ok(())
        }
    }
}
