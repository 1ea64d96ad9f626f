//! cellhealth - Battery SOH prediction entry point

use clap::Parser;
use cellhealth::cli::{cmd_chat, cmd_info, cmd_run, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cellhealth=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { data, segment, fraction, seed, threshold, out_dir } => {
            cmd_run(&data, segment.as_deref(), fraction, seed, threshold, &out_dir)?;
        }
        Commands::Info { data, segment } => {
            cmd_info(&data, segment.as_deref())?;
        }
        Commands::Chat { report } => {
            cmd_chat(report.as_ref()).await?;
        }
    }

    Ok(())
}
