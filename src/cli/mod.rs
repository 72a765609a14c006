//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "wheelhouse",
    version,
    about = "Car marketplace backend with natural-language catalog search",
    long_about = "Wheelhouse serves a car-marketplace catalog over a JSON API and interprets \
                  free-text Russian queries like \"семейный кроссовер до 2 млн\" into \
                  structured search filters."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/wheelhouse/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the API server in the foreground
    Serve,

    /// Load the seed catalog into the database
    Seed {
        /// Replace existing rows with matching ids instead of skipping a
        /// non-empty catalog
        #[arg(long)]
        force: bool,
    },

    /// Interpret a free-text query and print the recognized filters
    Parse {
        /// Query text, e.g. "семейный кроссовер до 2 млн"
        query: String,

        /// Print raw JSON instead of the human-readable summary
        #[arg(long)]
        json: bool,
    },

    /// Interpret a query and search the catalog
    Search {
        /// Query text
        query: String,

        /// Maximum number of results to print
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Print raw JSON instead of the human-readable listing
        #[arg(long)]
        json: bool,
    },

    /// Show catalog and account statistics
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
