use anyhow::{Context, Result};

use crate::error::DashboardError;
use crate::github::Loader;
use crate::project::Project;

/// A dashboard command. Every user-facing command word maps to exactly one
/// variant, so dispatch is a single exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Status,
    Sprint,
    Sprints,
    Backlog,
    Review,
    Changelog,
    Estimate,
    Refresh,
    Reset,
    Help,
}

impl Command {
    pub const ALL: &'static [&'static str] = &[
        "status",
        "sprint",
        "sprints",
        "backlog",
        "review",
        "changelog",
        "estimate",
        "refresh",
        "reset",
        "help",
    ];

    /// Parse a command word. Unknown words get `None`; callers fall back
    /// to `Help`.
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "status" => Some(Command::Status),
            "sprint" => Some(Command::Sprint),
            "sprints" => Some(Command::Sprints),
            "backlog" => Some(Command::Backlog),
            "review" => Some(Command::Review),
            "changelog" => Some(Command::Changelog),
            "estimate" => Some(Command::Estimate),
            "refresh" => Some(Command::Refresh),
            "reset" => Some(Command::Reset),
            "help" => Some(Command::Help),
            _ => None,
        }
    }
}

/// The command layer. Owns the loader and the current project; every
/// command returns rendered text for the caller to print.
///
/// Refresh and reset build a complete new project and swap it in, so a
/// command handler never observes a half-built aggregate.
pub struct Dashboard {
    loader: Loader,
    user: String,
    project: Project,
}

impl Dashboard {
    /// Perform the initial load and build the first project.
    pub fn new(loader: Loader, user: &str) -> Result<Self> {
        let project = build_project(&loader, LoadMode::Cached)?;
        Ok(Dashboard {
            loader,
            user: user.to_string(),
            project,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Run one command and return its rendered output.
    pub fn execute(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Status => Ok(self.status()),
            Command::Sprint => Ok(self.sprint()),
            Command::Sprints => Ok(self.sprints()),
            Command::Backlog => Ok(self.backlog()),
            Command::Review => Ok(self.review()),
            Command::Changelog => Ok(self.changelog()),
            Command::Estimate => Ok(self.estimate()),
            Command::Refresh => {
                self.project = build_project(&self.loader, LoadMode::Fresh)?;
                Ok(self.status())
            }
            Command::Reset => {
                self.project = build_project(&self.loader, LoadMode::Reset)?;
                Ok(self.status())
            }
            Command::Help => Ok(help_text()),
        }
    }

    fn status(&self) -> String {
        format!(
            "✅  {} issues and {} PR fetched.",
            self.project.issue_count(),
            self.project.pull_request_count()
        )
    }

    fn sprint(&self) -> String {
        match self.project.current_milestone() {
            Ok(milestone) => milestone.display(),
            Err(DashboardError::NoOpenMilestone) => no_sprint_message(),
            Err(other) => other.to_string(),
        }
    }

    fn sprints(&self) -> String {
        let sprints = self.project.sprints();
        if sprints.is_empty() {
            return no_sprint_message();
        }
        sprints
            .iter()
            .map(|m| m.display())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn backlog(&self) -> String {
        let backlogs = self.project.backlogs();
        if backlogs.is_empty() {
            return "Backlog is empty.".to_string();
        }
        backlogs
            .iter()
            .map(|m| m.display())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn review(&self) -> String {
        let pull_requests = self.project.pull_requests_awaiting_review(&self.user);
        if pull_requests.is_empty() {
            return "Nothing to review. Good job! 👍".to_string();
        }

        let mut lines = vec![format!(
            "🔍  {} pull requests awaiting your review:",
            pull_requests.len()
        )];
        lines.extend(pull_requests.iter().map(|pr| pr.display()));
        lines.join("\n")
    }

    fn changelog(&self) -> String {
        match self.project.current_milestone() {
            Ok(milestone) => milestone.display_changelog(),
            Err(DashboardError::NoOpenMilestone) => no_sprint_message(),
            Err(other) => other.to_string(),
        }
    }

    fn estimate(&self) -> String {
        let issues = self.project.issues_missing_estimation();
        if issues.is_empty() {
            return "All open issues are estimated.".to_string();
        }
        issues
            .iter()
            .map(|issue| issue.display())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

enum LoadMode {
    Cached,
    Fresh,
    Reset,
}

fn build_project(loader: &Loader, mode: LoadMode) -> Result<Project> {
    let records = match mode {
        LoadMode::Cached => loader.load(),
        LoadMode::Fresh => loader.refresh(),
        LoadMode::Reset => loader.reset(),
    }?;

    Project::from_records(&records).context("Failed to build project from fetched records")
}

fn help_text() -> String {
    format!("Available commands: {}", Command::ALL.join(", "))
}

fn no_sprint_message() -> String {
    "No open milestone. Nothing to show.".to_string()
}
