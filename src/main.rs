use anyhow::{Context, Result};
use clap::Parser;
use gh_agile_dashboard::{
    cache::CacheManager,
    cli::Cli,
    github::{GitHubClient, Loader},
    Command, Config, Dashboard,
};
use std::io::{BufRead, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Loading configuration");
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = &cli.cache_dir {
        config.cache.cache_dir = Some(dir.clone());
    }

    let settings = config
        .resolve_github(
            cli.owner.clone(),
            cli.repo.clone(),
            cli.user.clone(),
            cli.token.clone(),
        )
        .context("Failed to resolve repository settings")?;
    info!("Using repository {}/{}", settings.owner, settings.repo);

    let cache = if config.cache.enabled && !cli.no_cache {
        let manager = CacheManager::new(
            config.resolved_cache_dir()?,
            config.cache.ttl_hours,
            config.cache.compression_enabled,
        );
        if cli.clear_cache {
            manager.clear_all().context("Failed to clear cache")?;
        } else {
            manager.initialize().context("Failed to initialize cache")?;
        }
        Some(manager)
    } else {
        None
    };

    let client = GitHubClient::new(
        &settings.owner,
        &settings.repo,
        &settings.user,
        &settings.token,
    )
    .context("Failed to create GitHub client")?;
    let loader = Loader::new(client, cache, &settings.owner, &settings.repo);

    let mut dashboard =
        Dashboard::new(loader, &settings.user).context("Failed to load the project")?;

    let commands = if cli.commands.is_empty() {
        vec!["status".to_string()]
    } else {
        cli.commands.clone()
    };

    for word in &commands {
        let command = Command::parse(word).unwrap_or(Command::Help);
        let output = dashboard.execute(command)?;
        println!("{}", output);
    }

    if cli.interactive {
        run_prompt(&mut dashboard)?;
    }

    Ok(())
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Read commands from stdin one line at a time until EOF or `quit`.
fn run_prompt(dashboard: &mut Dashboard) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        write!(stdout, "gad> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        if word == "quit" || word == "exit" {
            break;
        }

        let command = Command::parse(word).unwrap_or(Command::Help);
        match dashboard.execute(command) {
            Ok(output) => println!("{}", output),
            Err(e) => eprintln!("❌ {:#}", e),
        }
    }

    Ok(())
}
