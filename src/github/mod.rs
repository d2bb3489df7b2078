mod client;
mod loader;
pub mod models;

pub use client::{GitHubClient, RealGitHub};
pub use loader::Loader;

#[cfg(test)]
pub use client::MockGitHub;
