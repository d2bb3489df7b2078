use anyhow::{anyhow, Context, Result};
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::debug;

use crate::github::models::{RawPull, RawRecord, RawReview};

const API_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;

/// GitHub client abstraction
pub enum GitHubClient {
    Real(RealGitHub),
    #[cfg(test)]
    Mock(MockGitHub),
}

impl GitHubClient {
    /// Create a new real GitHub client for one repository.
    pub fn new(owner: &str, repo: &str, user: &str, token: &str) -> Result<Self> {
        Ok(GitHubClient::Real(RealGitHub::new(owner, repo, user, token)?))
    }

    /// Create a mock client for testing
    #[cfg(test)]
    pub fn mock(mock: MockGitHub) -> Self {
        GitHubClient::Mock(mock)
    }

    /// Fetch all issues and pull requests, paginated, oldest endpoint order.
    pub fn fetch_issues(&self) -> Result<Vec<RawRecord>> {
        match self {
            GitHubClient::Real(client) => client.fetch_issues(),
            #[cfg(test)]
            GitHubClient::Mock(client) => Ok(client.records.clone()),
        }
    }

    /// Fetch pull request details (requested reviewers, merge state).
    pub fn fetch_pulls(&self) -> Result<Vec<RawPull>> {
        match self {
            GitHubClient::Real(client) => client.fetch_pulls(),
            #[cfg(test)]
            GitHubClient::Mock(client) => Ok(client.pulls.clone()),
        }
    }

    /// Fetch submitted reviews for one pull request.
    pub fn fetch_reviews(&self, number: u64) -> Result<Vec<RawReview>> {
        match self {
            GitHubClient::Real(client) => client.fetch_reviews(number),
            #[cfg(test)]
            GitHubClient::Mock(client) => Ok(client
                .reviews
                .iter()
                .filter(|(n, _)| *n == number)
                .flat_map(|(_, reviews)| reviews.clone())
                .collect()),
        }
    }
}

/// Real GitHub REST client using basic authentication.
pub struct RealGitHub {
    client: HttpClient,
    owner: String,
    repo: String,
    user: String,
    token: String,
}

impl RealGitHub {
    pub fn new(owner: &str, repo: &str, user: &str, token: &str) -> Result<Self> {
        if owner.is_empty() || repo.is_empty() {
            return Err(anyhow!(
                "No repository configured. Pass --owner and --repo or run inside a GitHub clone"
            ));
        }

        let client = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(default_headers())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(RealGitHub {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
            user: user.to_string(),
            token: token.to_string(),
        })
    }

    pub fn fetch_issues(&self) -> Result<Vec<RawRecord>> {
        self.fetch_paginated(&format!(
            "{}/repos/{}/{}/issues?state=all",
            API_URL, self.owner, self.repo
        ))
    }

    pub fn fetch_pulls(&self) -> Result<Vec<RawPull>> {
        self.fetch_paginated(&format!(
            "{}/repos/{}/{}/pulls?state=all",
            API_URL, self.owner, self.repo
        ))
    }

    pub fn fetch_reviews(&self, number: u64) -> Result<Vec<RawReview>> {
        self.fetch_paginated(&format!(
            "{}/repos/{}/{}/pulls/{}/reviews",
            API_URL, self.owner, self.repo, number
        ))
    }

    /// Walk pages until a short page signals the end of the result set.
    fn fetch_paginated<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let mut results = Vec::new();
        let mut page = 1;

        let separator = if url.contains('?') { '&' } else { '?' };

        loop {
            let page_url = format!("{}{}per_page={}&page={}", url, separator, PER_PAGE, page);
            debug!("GET {}", page_url);

            let response = self
                .client
                .get(&page_url)
                .basic_auth(&self.user, Some(&self.token))
                .send()
                .context("Failed to send request to GitHub API")?;

            let batch: Vec<T> = handle_response(response)?;
            let batch_len = batch.len();
            results.extend(batch);

            if batch_len < PER_PAGE {
                return Ok(results);
            }
            page += 1;
        }
    }
}

fn handle_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();

    if status.as_u16() == 401 || status.as_u16() == 403 {
        return Err(anyhow!(
            "GitHub authentication failed ({}). Check your user and token",
            status
        ));
    }
    if status.as_u16() == 404 {
        return Err(anyhow!("Repository not found. Check --owner and --repo"));
    }
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(anyhow!("GitHub API request failed ({}): {}", status, body));
    }

    response
        .json()
        .context("Failed to parse GitHub API response")
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("gh-agile-dashboard"));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers
}

/// Mock GitHub client for testing
#[cfg(test)]
#[derive(Default)]
pub struct MockGitHub {
    pub records: Vec<RawRecord>,
    pub pulls: Vec<RawPull>,
    pub reviews: Vec<(u64, Vec<RawReview>)>,
}

#[cfg(test)]
impl MockGitHub {
    pub fn new() -> Self {
        Self::default()
    }
}
