use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Repository and credential settings. Anything left unset falls back to
/// the local git configuration at resolution time.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GithubConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl")]
    pub ttl_hours: u32,
    #[serde(default = "default_compression_enabled")]
    pub compression_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

/// Fully resolved repository identity and credentials, passed explicitly to
/// the components that need them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubSettings {
    pub owner: String,
    pub repo: String,
    pub user: String,
    pub token: String,
}

impl Config {
    /// Load configuration from the default location or a specified path.
    /// A missing file simply yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {:?}", config_path))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", config_path))?;

        if let Some(dir) = config.cache.cache_dir.take() {
            config.cache.cache_dir = Some(expand_tilde(&dir)?);
        }

        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("gad").join("config.toml"))
    }

    /// The cache directory, defaulting to `~/.gad/cache`.
    pub fn resolved_cache_dir(&self) -> Result<PathBuf> {
        match &self.cache.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let home = dirs::home_dir().context("Could not determine home directory")?;
                Ok(home.join(".gad").join("cache"))
            }
        }
    }

    /// Resolve the repository identity and credentials. Explicit overrides
    /// win, then the config file, then the local git configuration.
    pub fn resolve_github(
        &self,
        owner: Option<String>,
        repo: Option<String>,
        user: Option<String>,
        token: Option<String>,
    ) -> Result<GithubSettings> {
        let detected = detect_repo_from_git();

        let owner = owner
            .or_else(|| self.github.owner.clone())
            .or_else(|| detected.as_ref().map(|(o, _)| o.clone()))
            .ok_or_else(|| {
                anyhow!("No repository owner. Pass --owner or run inside a GitHub clone")
            })?;
        let repo = repo
            .or_else(|| self.github.repo.clone())
            .or_else(|| detected.as_ref().map(|(_, r)| r.clone()))
            .ok_or_else(|| {
                anyhow!("No repository name. Pass --repo or run inside a GitHub clone")
            })?;
        let user = user
            .or_else(|| self.github.user.clone())
            .or_else(|| git_config("github.user"))
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_default()
            .trim()
            .to_string();
        let token = token
            .or_else(|| self.github.token.clone())
            .or_else(|| git_config("github.token"))
            .unwrap_or_default();

        Ok(GithubSettings {
            owner,
            repo,
            user,
            token,
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: default_cache_enabled(),
            ttl_hours: default_cache_ttl(),
            compression_enabled: default_compression_enabled(),
            cache_dir: None,
        }
    }
}

/// Read a single value from git configuration.
fn git_config(key: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["config", "--get", key])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let value = String::from_utf8(output.stdout).ok()?.trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Detect owner and repo from the `origin` remote of the current directory.
fn detect_repo_from_git() -> Option<(String, String)> {
    let url = git_config("remote.origin.url")?;
    parse_github_remote(&url)
}

/// Parse `owner/repo` out of a GitHub remote URL, ssh or https.
fn parse_github_remote(url: &str) -> Option<(String, String)> {
    let path = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("ssh://git@github.com/"))
        .or_else(|| url.strip_prefix("https://github.com/"))
        .or_else(|| url.strip_prefix("http://github.com/"))?;

    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.splitn(2, '/');
    let owner = parts.next()?.to_string();
    let repo = parts.next()?.trim_end_matches('/').to_string();

    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner, repo))
}

/// Expand tilde in paths to home directory
fn expand_tilde(path: &Path) -> Result<PathBuf> {
    if let Some(s) = path.to_str() {
        if let Some(rest) = s.strip_prefix("~/") {
            let home = dirs::home_dir().context("Could not determine home directory")?;
            return Ok(home.join(rest));
        }
    }
    Ok(path.to_path_buf())
}

// Default value functions
fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u32 {
    24
}

fn default_compression_enabled() -> bool {
    true
}
