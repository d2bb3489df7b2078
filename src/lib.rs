pub mod cache;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod github;
pub mod project;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use dashboard::{Command, Dashboard};
pub use error::DashboardError;
pub use project::Project;
