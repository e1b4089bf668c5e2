mod cli;
mod commands;
mod executor;
mod groups;
mod mcp;
mod package;
mod page_range;
mod pdf;
mod plan;
mod suggest;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    // Logs go to stderr; stdout carries results (and the MCP protocol).
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path)?;
        }
        Commands::Range {
            path,
            pages,
            output,
        } => {
            commands::range::run(&path, &pages, &output).await?;
        }
        Commands::Every {
            path,
            output_dir,
            zip,
        } => {
            commands::every::run(&path, output_dir.as_deref(), zip.as_deref()).await?;
        }
        Commands::Groups {
            path,
            groups,
            groups_file,
            allow_overlaps,
            output,
        } => {
            commands::groups::run(
                &path,
                &groups,
                groups_file.as_deref(),
                allow_overlaps,
                output.as_deref(),
            )
            .await?;
        }
        Commands::Suggest {
            path,
            model,
            api_key,
            output,
        } => {
            commands::suggest::run(&path, &model, api_key, output.as_deref()).await?;
        }
    }

    Ok(())
}
