use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "userboard")]
#[command(about = "Browse a user directory REST API from the terminal", version)]
#[command(after_help = "EXAMPLES:
    userboard users                     List all users
    userboard users --city jakarta      Users in one city
    userboard user 3                    Show one user
    userboard get /health               Load any endpoint
    userboard health                    Test the backend connection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, cards, json)
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Suppress status messages other than errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show detailed error information and debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Backend base URL (overrides USERBOARD_BASE_URL and the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout for the fallback transport, in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,
}

impl Cli {
    /// Get the effective output format, considering --json flag
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List users, optionally filtered by city or job
    #[command(
        alias = "ls",
        after_help = "EXAMPLES:
    userboard users
    userboard users --city bandung
    userboard users --job developer --format cards"
    )]
    Users(UsersArgs),
    /// Show a single user
    #[command(after_help = "EXAMPLES:
    userboard user 1
    userboard user 1 --json")]
    User {
        /// Numeric user id
        id: u64,
    },
    /// Load any endpoint and display it according to its shape
    #[command(after_help = "EXAMPLES:
    userboard get /api/users
    userboard get http://13.210.70.244:5000/api/users/2
    userboard get /")]
    Get {
        /// Absolute URL, or a path under the base URL
        endpoint: String,
    },
    /// Test the connection to the backend's /health endpoint
    Health,
    /// Write one user's record as JSON
    #[command(after_help = "EXAMPLES:
    userboard export 4
    userboard export 4 --out user-4.json")]
    Export(ExportArgs),
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    userboard completions bash > ~/.bash_completion.d/userboard
    userboard completions zsh > ~/.zfunc/_userboard")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    Init,
}

#[derive(Args, Clone)]
pub struct UsersArgs {
    /// Only users living in this city
    #[arg(long, conflicts_with = "job")]
    pub city: Option<String>,

    /// Only users with this job
    #[arg(long)]
    pub job: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Numeric user id
    pub id: u64,

    /// File to write (defaults to stdout)
    #[arg(long, short = 'O')]
    pub out: Option<PathBuf>,
}
