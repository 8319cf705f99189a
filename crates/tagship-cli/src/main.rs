mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tagship", about = "Version, tag, build and promote a release")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full release pipeline for the project
    Release(commands::ReleaseArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Release(args) => commands::release(args).await?,
    }

    Ok(())
}
