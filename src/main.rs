mod cli;
mod commands;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use port_registry::{Error as RegistryError, RegistryStore};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        if let Some(registry_error) = e.downcast_ref::<RegistryError>() {
            eprintln!("Error: {}", registry_error);
            if let Some(suggestion) = registry_error.suggestion() {
                eprintln!("\nHint: {}", suggestion);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;

    let store = RegistryStore::new(&cli.registry);

    match &cli.command {
        Commands::Sync => {
            commands::run_sync(&store, &cli.out_dir, &output::CliOutput).await?;
        }
        Commands::Validate { mode } => {
            commands::run_validate(&store, *mode, &output::CliOutput)?;
        }
        Commands::Report => {
            commands::run_report(&store, &output::CliOutput)?;
        }
        Commands::Scan { roots } => {
            commands::run_scan(&store, roots, &output::CliOutput)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
        }
    }

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
