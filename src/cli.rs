use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gad",
    about = "Agile sprint/backlog dashboard for a GitHub repository",
    version
)]
pub struct Cli {
    /// Repository owner (defaults to the origin remote)
    #[arg(short, long, env = "GAD_OWNER")]
    pub owner: Option<String>,

    /// Repository name (defaults to the origin remote)
    #[arg(short, long, env = "GAD_REPO")]
    pub repo: Option<String>,

    /// GitHub user the review query runs for
    #[arg(short, long, env = "GAD_USER")]
    pub user: Option<String>,

    /// Personal access token for basic authentication
    #[arg(short, long, env = "GAD_TOKEN")]
    pub token: Option<String>,

    /// Path to configuration file
    #[arg(long, env = "GAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the cache directory
    #[arg(short, long)]
    pub cache_dir: Option<PathBuf>,

    /// Bypass the cache and fetch fresh data
    #[arg(long)]
    pub no_cache: bool,

    /// Clear cached data before loading
    #[arg(long)]
    pub clear_cache: bool,

    /// Keep a command prompt open after running the commands
    #[arg(short, long)]
    pub interactive: bool,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Dashboard commands to run, in order (defaults to `status`)
    #[arg(value_name = "COMMAND")]
    pub commands: Vec<String>,
}
