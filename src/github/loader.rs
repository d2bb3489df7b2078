use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::cache::{generate_cache_key, CacheManager};
use crate::github::client::GitHubClient;
use crate::github::models::{RawPull, RawRecord};

/// Fetches the repository's full record set and keeps a local copy so a
/// dashboard restart does not refetch unchanged data.
///
/// The issues endpoint delivers both issues and pull requests but omits
/// reviewer information, so pull records are enriched from the pulls and
/// reviews endpoints before anything downstream sees them. Consumers only
/// ever receive the final merged list.
pub struct Loader {
    client: GitHubClient,
    cache: Option<CacheManager>,
    owner: String,
    repo: String,
}

impl Loader {
    pub fn new(client: GitHubClient, cache: Option<CacheManager>, owner: &str, repo: &str) -> Self {
        Loader {
            client,
            cache,
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    /// Load records, serving from the cache when a fresh enough copy exists.
    pub fn load(&self) -> Result<Vec<RawRecord>> {
        if let Some(cache) = &self.cache {
            if let Some(data) = cache.get_records(&self.cache_key())? {
                debug!("Using cached records for {}/{}", self.owner, self.repo);
                let records: Vec<RawRecord> = serde_json::from_slice(&data)
                    .context("Failed to parse cached records")?;
                return Ok(records);
            }
        }

        self.refresh()
    }

    /// Fetch fresh records from the API, rewriting the cache copy.
    pub fn refresh(&self) -> Result<Vec<RawRecord>> {
        info!("Fetching records for {}/{}", self.owner, self.repo);

        let records = self.fetch_merged()?;

        if let Some(cache) = &self.cache {
            let data = serde_json::to_vec(&records).context("Failed to serialize records")?;
            cache.store_records(&self.cache_key(), &data)?;
        }

        Ok(records)
    }

    /// Drop the cache entirely, then fetch fresh.
    pub fn reset(&self) -> Result<Vec<RawRecord>> {
        if let Some(cache) = &self.cache {
            cache.clear_all()?;
        }
        self.refresh()
    }

    fn fetch_merged(&self) -> Result<Vec<RawRecord>> {
        let mut records = self.client.fetch_issues()?;

        let pulls: HashMap<u64, RawPull> = self
            .client
            .fetch_pulls()?
            .into_iter()
            .map(|pull| (pull.number, pull))
            .collect();

        for record in &mut records {
            if !record.is_pull_request() {
                continue;
            }
            let Some(number) = record.number else {
                // Malformed records surface at project construction
                continue;
            };
            if let Some(pull) = pulls.get(&number) {
                record.requested_reviewers = pull.requested_reviewers.clone();
                record.merged_at = pull.merged_at.clone();
            }
            // Reviews feed the awaiting-review predicate, so any pull
            // request that still lists requested reviewers needs them,
            // not just the open ones
            if record.state.as_deref() == Some("open") || !record.requested_reviewers.is_empty() {
                record.reviews = self.client.fetch_reviews(number)?;
            }
        }

        info!("Fetched {} records", records.len());
        Ok(records)
    }

    fn cache_key(&self) -> String {
        generate_cache_key(&[&self.owner, &self.repo, "records"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::client::MockGitHub;
    use crate::github::models::{RawReview, RawUser};
    use crate::test_utils::{raw_issue, raw_pull_request};
    use tempfile::TempDir;

    fn mock_with_review_data() -> MockGitHub {
        let mut mock = MockGitHub::new();
        mock.records.push(raw_issue(1, "An issue", "open"));
        mock.records.push(raw_pull_request(2, "A PR", "open", &[]));
        mock.pulls.push(RawPull {
            number: 2,
            requested_reviewers: vec![
                RawUser {
                    login: "alice".to_string(),
                },
                RawUser {
                    login: "bob".to_string(),
                },
            ],
            merged_at: None,
        });
        mock.reviews.push((
            2,
            vec![RawReview {
                user: Some(RawUser {
                    login: "alice".to_string(),
                }),
                state: Some("APPROVED".to_string()),
            }],
        ));
        mock
    }

    #[test]
    fn test_load_merges_reviewer_data() {
        let loader = Loader::new(
            GitHubClient::mock(mock_with_review_data()),
            None,
            "owner",
            "repo",
        );

        let records = loader.load().unwrap();

        assert_eq!(records.len(), 2);
        let pr = &records[1];
        assert!(pr.is_pull_request());
        assert_eq!(pr.requested_reviewers.len(), 2);
        assert_eq!(pr.reviews.len(), 1);
        // The plain issue is untouched
        assert!(records[0].requested_reviewers.is_empty());
    }

    #[test]
    fn test_closed_pull_request_with_reviewers_gets_reviews() {
        let mut mock = MockGitHub::new();
        mock.records
            .push(raw_pull_request(4, "Stale PR", "closed", &[]));
        mock.pulls.push(RawPull {
            number: 4,
            requested_reviewers: vec![RawUser {
                login: "alice".to_string(),
            }],
            merged_at: None,
        });
        mock.reviews.push((
            4,
            vec![RawReview {
                user: Some(RawUser {
                    login: "alice".to_string(),
                }),
                state: Some("APPROVED".to_string()),
            }],
        ));

        let loader = Loader::new(GitHubClient::mock(mock), None, "owner", "repo");
        let records = loader.load().unwrap();

        // The decision map is complete even though the PR is closed, so
        // alice is not reported as still owing a review
        assert_eq!(records[0].reviews.len(), 1);
        let project = crate::project::Project::from_records(&records).unwrap();
        assert!(project.pull_requests_awaiting_review("alice").is_empty());
    }

    #[test]
    fn test_load_populates_and_reuses_cache() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::new(temp_dir.path().to_path_buf(), 24, true);
        cache.initialize().unwrap();

        let loader = Loader::new(
            GitHubClient::mock(mock_with_review_data()),
            Some(cache),
            "owner",
            "repo",
        );

        let first = loader.load().unwrap();
        assert_eq!(first.len(), 2);

        // Second load is served from the cache: an empty mock would fail
        // if the loader went back to the API
        let empty_cache = CacheManager::new(temp_dir.path().to_path_buf(), 24, true);
        let cached_loader = Loader::new(
            GitHubClient::mock(MockGitHub::new()),
            Some(empty_cache),
            "owner",
            "repo",
        );
        let second = cached_loader.load().unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[1].requested_reviewers.len(), 2);
    }

    #[test]
    fn test_reset_clears_cache() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::new(temp_dir.path().to_path_buf(), 24, true);
        cache.initialize().unwrap();

        let seed_loader = Loader::new(
            GitHubClient::mock(mock_with_review_data()),
            Some(cache),
            "owner",
            "repo",
        );
        assert_eq!(seed_loader.load().unwrap().len(), 2);

        // Reset with a mock that has diverged from the cached copy: the
        // result must come from the API, not the two cached records
        let mut diverged = mock_with_review_data();
        diverged.records.push(raw_issue(3, "New issue", "open"));
        let reset_cache = CacheManager::new(temp_dir.path().to_path_buf(), 24, true);
        let reset_loader = Loader::new(
            GitHubClient::mock(diverged),
            Some(reset_cache),
            "owner",
            "repo",
        );
        let records = reset_loader.reset().unwrap();
        assert_eq!(records.len(), 3);

        // And the cache now holds the fresh copy, not the stale one
        let check_cache = CacheManager::new(temp_dir.path().to_path_buf(), 24, true);
        let cached_loader = Loader::new(
            GitHubClient::mock(MockGitHub::new()),
            Some(check_cache),
            "owner",
            "repo",
        );
        assert_eq!(cached_loader.load().unwrap().len(), 3);
    }

    #[test]
    fn test_refresh_bypasses_cache() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::new(temp_dir.path().to_path_buf(), 24, true);
        cache.initialize().unwrap();

        let loader = Loader::new(
            GitHubClient::mock(mock_with_review_data()),
            Some(cache),
            "owner",
            "repo",
        );
        loader.load().unwrap();

        let mut bigger = mock_with_review_data();
        bigger.records.push(raw_issue(3, "New issue", "open"));
        let refresh_cache = CacheManager::new(temp_dir.path().to_path_buf(), 24, true);
        let refreshed_loader =
            Loader::new(GitHubClient::mock(bigger), Some(refresh_cache), "owner", "repo");

        let records = refreshed_loader.refresh().unwrap();
        assert_eq!(records.len(), 3);

        // And the cache now holds the refreshed copy
        let check_cache = CacheManager::new(temp_dir.path().to_path_buf(), 24, true);
        let cached_loader = Loader::new(
            GitHubClient::mock(MockGitHub::new()),
            Some(check_cache),
            "owner",
            "repo",
        );
        assert_eq!(cached_loader.load().unwrap().len(), 3);
    }
}
