use serde::{Deserialize, Serialize};

/// One raw item from the issues endpoint. Covers both issues and pull
/// requests; the `pull_request` marker is the type discriminator.
///
/// Fields are deliberately lenient (everything optional) so a load never
/// fails inside serde. Required-field validation happens when the project
/// is built, where a missing field becomes an explicit `MalformedRecord`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawRecord {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    pub milestone: Option<RawMilestone>,
    pub assignee: Option<RawUser>,
    pub user: Option<RawUser>,
    /// Present on pull requests, absent on plain issues.
    pub pull_request: Option<RawPullRequestMarker>,
    /// Merged into the record by the loader from the pulls endpoint.
    #[serde(default)]
    pub requested_reviewers: Vec<RawUser>,
    /// Merged into the record by the loader from the reviews endpoint.
    #[serde(default)]
    pub reviews: Vec<RawReview>,
    pub merged_at: Option<String>,
}

/// Marker object GitHub attaches to issue records that are pull requests.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPullRequestMarker {
    pub url: Option<String>,
    pub merged_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawMilestone {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub state: Option<String>,
    pub due_on: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawLabel {
    pub name: String,
}

/// One submitted review on a pull request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawReview {
    pub user: Option<RawUser>,
    pub state: Option<String>,
}

/// Pull request detail from the pulls endpoint, used to enrich the flat
/// issue records with reviewer information.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPull {
    pub number: u64,
    #[serde(default)]
    pub requested_reviewers: Vec<RawUser>,
    pub merged_at: Option<String>,
}

impl RawRecord {
    /// Whether this record is a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}
