use clap::Parser;
use k8s_observability_agent::cli::{Cli, Commands};
use k8s_observability_agent::error::Result;
use k8s_observability_agent::{config, handlers};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    match run(cli).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    log::debug!("loading configuration");
    let file_config = config::load_config(cli.config.as_deref())?;
    let json = cli.json;

    match cli.command {
        Commands::Scan { path, aws_region } => {
            handlers::handle_scan(&path, &file_config.extraction, &aws_region, json).await
        }
        Commands::Analyze { path, api_key, model, max_turns, aws_region } => {
            handlers::handle_analyze(
                &path,
                &file_config.extraction,
                &file_config.agent,
                &aws_region,
                api_key,
                model,
                max_turns,
                json,
            )
            .await
            .map(|_plan| ())
        }
        Commands::Validate { api_key, model, max_turns, allow_writes, history_db } => {
            handlers::handle_validate(&file_config.agent, api_key, model, max_turns, allow_writes, history_db, json)
                .await
                .map(|_report| ())
        }
    }
}
