//! Raw record builders shared by unit tests.
#![cfg(test)]

use crate::github::models::{
    RawLabel, RawMilestone, RawPullRequestMarker, RawRecord, RawReview, RawUser,
};

/// Create a raw issue record.
pub fn raw_issue(number: u64, title: &str, state: &str) -> RawRecord {
    RawRecord {
        number: Some(number),
        title: Some(title.to_string()),
        state: Some(state.to_string()),
        labels: vec![],
        milestone: None,
        assignee: None,
        user: Some(RawUser {
            login: "author".to_string(),
        }),
        pull_request: None,
        requested_reviewers: vec![],
        reviews: vec![],
        merged_at: None,
    }
}

/// Create a raw pull request record with the given requested reviewers.
pub fn raw_pull_request(number: u64, title: &str, state: &str, reviewers: &[&str]) -> RawRecord {
    let mut record = raw_issue(number, title, state);
    record.pull_request = Some(RawPullRequestMarker::default());
    record.requested_reviewers = reviewers
        .iter()
        .map(|login| RawUser {
            login: login.to_string(),
        })
        .collect();
    record
}

/// Attach a submitted review to a record.
pub fn with_review(mut record: RawRecord, reviewer: &str, state: &str) -> RawRecord {
    record.reviews.push(RawReview {
        user: Some(RawUser {
            login: reviewer.to_string(),
        }),
        state: Some(state.to_string()),
    });
    record
}

/// Create a raw milestone header. `due_on` takes a plain `YYYY-MM-DD` date.
pub fn raw_milestone(number: u64, title: &str, state: &str, due_on: Option<&str>) -> RawMilestone {
    RawMilestone {
        number: Some(number),
        title: Some(title.to_string()),
        state: Some(state.to_string()),
        due_on: due_on.map(|d| format!("{}T00:00:00Z", d)),
    }
}

/// Attach a milestone reference to a record.
pub fn in_milestone(mut record: RawRecord, milestone: RawMilestone) -> RawRecord {
    record.milestone = Some(milestone);
    record
}

/// Add a label to a record.
pub fn with_label(mut record: RawRecord, name: &str) -> RawRecord {
    record.labels.push(RawLabel {
        name: name.to_string(),
    });
    record
}
