//! budgetlink - run Actual Budget REST API workflow steps from the command line

use std::path::PathBuf;

use anyhow::Context;
use budgetlink_app::{check_credentials, node_schema, run_workflow, AppContext, Workflow};
use budgetlink_domain::{AuthMode, Config, LoggingConfig};
use budgetlink_infra::{config, init_logging};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "budgetlink", version)]
#[command(about = "Run Actual Budget REST API workflow steps")]
struct Cli {
    /// Configuration file (TOML or JSON); defaults to environment, then probed files
    #[arg(long, global = true, env = "BUDGETLINK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute the items of a workflow file and print their results
    Run {
        /// Workflow JSON file
        workflow: PathBuf,
        /// Record failing items as results instead of aborting
        #[arg(long)]
        continue_on_fail: bool,
    },
    /// Print the node schema
    Schema,
    /// Test the configured credentials against the health endpoint
    Check {
        /// Authentication mode to test (defaults to the configured mode)
        #[arg(long, value_parser = parse_auth_mode)]
        auth: Option<AuthMode>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads `env` arguments
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Commands::Schema = cli.command {
        init_logging(&LoggingConfig::default())?;
        return print_json(&node_schema());
    }

    let config = load_config(cli.config)?;
    init_logging(&config.logging)?;
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env file loaded"),
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Run { workflow, continue_on_fail } => {
            let workflow = Workflow::load(&workflow)?;
            match run_workflow(&ctx, workflow, continue_on_fail).await {
                Ok(outputs) => print_json(&outputs),
                Err(aborted) => {
                    print_json(&aborted.completed)?;
                    let index = aborted.error.index.map_or("-".to_string(), |i| i.to_string());
                    tracing::error!(
                        index = %index,
                        kind = aborted.error.error.kind().label(),
                        "run aborted"
                    );
                    Err(anyhow::anyhow!(aborted.error.error.user_message()))
                }
            }
        }
        Commands::Check { auth } => {
            let mode = auth.unwrap_or(ctx.config.credentials.mode);
            let health = check_credentials(&ctx, mode)
                .await
                .map_err(|err| anyhow::anyhow!(err.user_message()))?;
            print_json(&health)
        }
        Commands::Schema => Ok(()),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => config::load_from_file(Some(path.clone()))
            .with_context(|| format!("loading {}", path.display())),
        None => config::load().context("no configuration found in environment or config files"),
    }
}

fn parse_auth_mode(value: &str) -> Result<AuthMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "jwt" => Ok(AuthMode::Jwt),
        "oauth2" => Ok(AuthMode::OAuth2),
        other => Err(format!("unknown authentication mode: {other}")),
    }
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
