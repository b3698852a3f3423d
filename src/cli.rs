use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory holding settings, the caught collection and the log file.
    #[arg(long, env = "POKEFOCUS_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the study timer (default).
    Timer {
        #[arg(short, long)]
        minutes: Option<u64>,

        #[arg(short, long)]
        seconds: Option<u64>,

        #[arg(long)]
        api_base_url: Option<String>,
    },
    /// Print the caught collection sorted by number and exit.
    Gallery,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Timer {
            minutes: None,
            seconds: None,
            api_base_url: None,
        }
    }
}

pub fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| dirs::data_dir().map(|dir| dir.join("pokefocus")))
        .unwrap_or_else(|| PathBuf::from(".pokefocus"))
}
