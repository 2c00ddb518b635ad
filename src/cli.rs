/// CLI argument parsing

use clap::{Parser, Subcommand};
use std::time::Duration;

// Build timestamp injected at compile time
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Parser)]
#[command(name = "dada-dash")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    /// TVL API base URL (overrides config and DADA_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Protocol to chart; repeat to show several (replaces the configured list)
    #[arg(short, long = "protocol", global = true)]
    pub protocols: Vec<String>,

    /// Request timeout, e.g. "5s" or "1m"
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch TVL series once and print them
    Fetch {
        /// Protocol names (defaults to the configured list)
        names: Vec<String>,

        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Serve TVL series from a directory of JSON files
    #[cfg(feature = "server")]
    Serve {
        /// Directory with one <protocol>.json file per protocol
        #[arg(short, long, default_value = "data")]
        data_dir: String,

        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Enable CORS for cross-origin requests
        #[arg(long)]
        cors: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// View effective configuration
    View,

    /// Write a config file with the current settings
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::parse_from([
            "dada-dash", "fetch", "Minswap", "--endpoint", "http://x:1", "--timeout", "5s",
        ]);
        assert_eq!(cli.endpoint.as_deref(), Some("http://x:1"));
        assert_eq!(cli.timeout, Some(Duration::from_secs(5)));
        match cli.command {
            Some(Commands::Fetch { names, json }) => {
                assert_eq!(names, vec!["Minswap"]);
                assert!(!json);
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_repeated_protocol_flag() {
        let cli = Cli::parse_from(["dada-dash", "-p", "Minswap", "-p", "Liqwid"]);
        assert_eq!(cli.protocols, vec!["Minswap", "Liqwid"]);
        assert!(cli.command.is_none());
    }
}
