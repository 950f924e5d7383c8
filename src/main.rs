//! Loan Approval - Main Entry Point
//!
//! Serves loan approval predictions over HTTP, with artifact inspection and
//! offline prediction subcommands.

use clap::Parser;
use loan_approval::cli::{cmd_info, cmd_predict, cmd_serve, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loan_approval=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { host, port, model_dir }) => {
            cmd_serve(host, port, model_dir).await?;
        }
        Some(Commands::Info { model_dir }) => {
            cmd_info(model_dir)?;
        }
        Some(Commands::Predict { input, model_dir }) => {
            cmd_predict(&input, model_dir)?;
        }
        None => {
            cmd_serve(None, None, None).await?;
        }
    }

    Ok(())
}
