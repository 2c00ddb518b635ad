use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use futures::future::join_all;

use dada_dash::app::App;
use dada_dash::cli::{Cli, Commands, ConfigCommands, BUILD_TIMESTAMP};
use dada_dash::core::{series_report, HttpTvlSource, TvlSource};
use dada_dash::utils::{format_with_commas, logging, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    config.override_endpoint(cli.endpoint.clone());
    config.override_protocols(cli.protocols.clone());
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout.as_secs().max(1);
    }

    match cli.command {
        None => {
            // No command - run interactive TUI
            let log_path = config.log_path()?;
            logging::init_file(&log_path)?;
            tracing::info!(built = BUILD_TIMESTAMP, log = %log_path.display(), "dada-dash starting");

            let mut app = App::new(&config)?;
            app.run().await?;
        }
        Some(Commands::Fetch { names, json }) => {
            logging::init_stderr();
            let names = if names.is_empty() { config.protocols.clone() } else { names };
            handle_fetch(&config, names, json).await?;
        }
        Some(Commands::Config { command }) => {
            handle_config(command, &config)?;
        }
        #[cfg(feature = "server")]
        Some(Commands::Serve { data_dir, port, host, cors }) => {
            logging::init_stderr();
            dada_dash::server::run(std::path::Path::new(&data_dir), &host, port, cors).await?;
        }
    }

    Ok(())
}

async fn handle_fetch(config: &AppConfig, protocols: Vec<String>, json: bool) -> Result<()> {
    let source = HttpTvlSource::new(&config.endpoint, config.request_timeout())?;

    // Every protocol is fetched independently; one failure never hides the others
    let results = join_all(protocols.iter().map(|p| source.fetch_series(p))).await;

    let mut failures = 0;
    let mut fetched = Vec::new();
    for (protocol, result) in protocols.iter().zip(results) {
        match result {
            Ok(series) if json => fetched.push((protocol.clone(), series)),
            Ok(series) => {
                println!("{}", format!("{} TVL Over Time", protocol).bold());
                println!("{:<30} {:>20}", "Timestamp", "TVL");
                println!("{}", "-".repeat(51));
                for point in &series {
                    println!("{:<30} {:>20}", point.timestamp, format_with_commas(point.tvl));
                }
                println!("{} {} points from {}\n", "✓".green(), series.len(), source.url_for(protocol));
            }
            Err(e) => {
                failures += 1;
                tracing::error!(%protocol, error = %e, "failed to fetch TVL series");
                eprintln!("{} {}: {}\n", "✗".red(), protocol, e);
            }
        }
    }

    if json {
        let report = series_report(&fetched).context("Failed to serialize series")?;
        let body = serde_json::to_string_pretty(&report).context("Failed to serialize series")?;
        println!("{}", body);
    }

    if failures == protocols.len() && !protocols.is_empty() {
        anyhow::bail!("All {} fetches failed", failures);
    }

    Ok(())
}

fn handle_config(command: ConfigCommands, config: &AppConfig) -> Result<()> {
    match command {
        ConfigCommands::View => {
            println!("Configuration:\n");
            println!("{}: {}", "endpoint".cyan(), config.endpoint);
            println!("{}: {}", "protocols".cyan(), config.protocols.join(", "));
            println!("{}: {}s", "request_timeout".cyan(), config.request_timeout_secs);
            println!("{}: {}", "log_file".cyan(), config.log_path()?.display());
        }
        ConfigCommands::Init { force } => {
            let path = AppConfig::config_path()?;
            if path.exists() && !force {
                println!("{} Config already exists at {}", "!".yellow(), path.display());
                println!("Use --force to overwrite it.");
                return Ok(());
            }
            let path = config.save()?;
            println!("{} Wrote {}", "✓".green(), path.display());
        }
        ConfigCommands::Path => {
            println!("{}", AppConfig::config_path()?.display());
        }
    }

    Ok(())
}
