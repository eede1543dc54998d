pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "campus-survey")]
#[command(about = "Greets the visitor, summarizes data, resolves ZIP codes and validates survey answers")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "campus-survey.toml")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the greeting, asking for a name on first visit
    Greet,
    /// Change the remembered visitor name
    Rename,
    /// Average and maximum of ten comma-separated numbers
    Summarize { data: String },
    /// Resolve a ZIP code to city and state
    Zip { code: String },
    /// Validate a survey answers file as if the form were submitted
    Submit {
        #[arg(short, long)]
        answers: String,
    },
}
