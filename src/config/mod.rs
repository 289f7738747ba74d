pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "mount-odds")]
#[command(about = "Track boss kills across characters and the odds of a mount drop")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = "mount-odds.toml")]
    pub config: String,

    /// Directory holding the settings file
    #[arg(long, global = true, default_value = ".")]
    pub data_dir: String,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Look up every saved character and report kills per tracked boss
    Lookup {
        /// Skip the Total row
        #[arg(long)]
        no_total: bool,
    },
    /// Manage tracked bosses
    Boss {
        #[command(subcommand)]
        action: BossAction,
    },
    /// Manage saved characters
    Character {
        #[command(subcommand)]
        action: CharacterAction,
    },
    /// Chance of having seen at least one drop after a number of kills
    Odds {
        kills: u32,
        #[arg(long)]
        rate: Option<f64>,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum BossAction {
    Add { id: String, name: String },
    Remove { id: String },
    List,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum CharacterAction {
    Add {
        name: String,
        /// Realm; falls back to lookup.default_realm
        realm: Option<String>,
    },
    Remove {
        name: String,
        realm: Option<String>,
    },
    List,
}
