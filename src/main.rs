//! Runlens CLI entry point.

use clap::Parser;

use runlens::cli::{self, Cli, Commands, commands};
use runlens::infrastructure::{ConfigLoader, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli
        .config
        .as_deref()
        .map_or_else(ConfigLoader::load, ConfigLoader::load_from_file)
    {
        Ok(config) => config,
        Err(err) => cli::handle_error(err, cli.json),
    };

    if let Err(err) = logging::init(&config.logging) {
        cli::handle_error(err, cli.json);
    }

    let result = match cli.command {
        Commands::Summary(args) => commands::summary::execute(args, cli.json, &config).await,
        Commands::Raw(args) => commands::raw::execute(args, cli.json, &config).await,
        Commands::Status(args) => commands::status::execute(args, cli.json, &config).await,
        Commands::Compare(args) => commands::compare::execute(args, cli.json, &config).await,
        Commands::Report(args) => commands::report::execute(args, cli.json, &config).await,
        Commands::Charts(args) => commands::charts::execute(args, cli.json, &config).await,
        Commands::CompareCharts(args) => {
            commands::compare_charts::execute(args, cli.json, &config).await
        }
        Commands::Batch(args) => commands::batch::execute(args, cli.json, &config).await,
        Commands::Cache(command) => commands::cache::execute(command, cli.json, &config).await,
    };

    if let Err(err) = result {
        cli::handle_error(err, cli.json);
    }
}
