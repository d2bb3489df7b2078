use std::collections::BTreeMap;

use crate::error::DashboardError;
use crate::github::models::RawRecord;

/// State of an issue, pull request or milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Open,
    Closed,
}

impl ItemState {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(ItemState::Open),
            "closed" => Some(ItemState::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Open => "open",
            ItemState::Closed => "closed",
        }
    }
}

/// A reviewer's submitted decision on a pull request. Comment-only reviews
/// do not count as a decision, so they never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approved,
    ChangesRequested,
}

/// A normalized issue. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: ItemState,
    pub labels: Vec<String>,
    pub milestone_id: Option<u64>,
    pub estimate: Option<u32>,
    pub assignee: Option<String>,
}

impl Issue {
    /// Build an issue from a raw record, validating required fields.
    pub fn from_raw(record: &RawRecord) -> Result<Self, DashboardError> {
        let (number, state) = validate_required(record)?;
        let raw_title = record.title.as_deref().ok_or(DashboardError::MalformedRecord {
            number: Some(number),
            field: "title",
        })?;
        let (estimate, title) = parse_estimate(raw_title);

        Ok(Issue {
            number,
            title,
            state,
            labels: record.labels.iter().map(|l| l.name.clone()).collect(),
            milestone_id: milestone_id(record)?,
            estimate,
            assignee: record.assignee.as_ref().map(|u| u.login.clone()),
        })
    }

    /// One-line rendering: number, title, estimate when present, state.
    pub fn display(&self) -> String {
        match self.estimate {
            Some(points) => format!(
                "#{} {} [{} pts] ({})",
                self.number,
                self.title,
                points,
                self.state.as_str()
            ),
            None => format!("#{} {} ({})", self.number, self.title, self.state.as_str()),
        }
    }
}

/// A normalized pull request. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: ItemState,
    pub labels: Vec<String>,
    pub milestone_id: Option<u64>,
    pub estimate: Option<u32>,
    pub author: Option<String>,
    pub merged: bool,
    pub requested_reviewers: Vec<String>,
    pub decisions: BTreeMap<String, ReviewDecision>,
}

impl PullRequest {
    /// Build a pull request from a raw record, validating required fields.
    pub fn from_raw(record: &RawRecord) -> Result<Self, DashboardError> {
        let (number, state) = validate_required(record)?;
        let raw_title = record.title.as_deref().ok_or(DashboardError::MalformedRecord {
            number: Some(number),
            field: "title",
        })?;
        let (estimate, title) = parse_estimate(raw_title);

        let mut decisions = BTreeMap::new();
        for review in &record.reviews {
            let (Some(user), Some(review_state)) = (&review.user, &review.state) else {
                continue;
            };
            let decision = match review_state.as_str() {
                "APPROVED" => ReviewDecision::Approved,
                "CHANGES_REQUESTED" => ReviewDecision::ChangesRequested,
                // COMMENTED, PENDING and DISMISSED leave the reviewer undecided
                _ => continue,
            };
            decisions.insert(user.login.clone(), decision);
        }

        let merged = record.merged_at.is_some()
            || record
                .pull_request
                .as_ref()
                .is_some_and(|marker| marker.merged_at.is_some());

        Ok(PullRequest {
            number,
            title,
            state,
            labels: record.labels.iter().map(|l| l.name.clone()).collect(),
            milestone_id: milestone_id(record)?,
            estimate,
            author: record.user.as_ref().map(|u| u.login.clone()),
            merged,
            requested_reviewers: record
                .requested_reviewers
                .iter()
                .map(|u| u.login.clone())
                .collect(),
            decisions,
        })
    }

    /// Whether `user` has been asked to review and has not yet decided.
    pub fn is_awaiting_review(&self, user: &str) -> bool {
        self.requested_reviewers.iter().any(|r| r == user) && !self.decisions.contains_key(user)
    }

    /// One-line rendering including review status.
    pub fn display(&self) -> String {
        format!("#{} {} ({})", self.number, self.title, self.review_status())
    }

    fn review_status(&self) -> String {
        if self.merged {
            return "merged".to_string();
        }
        if self
            .decisions
            .values()
            .any(|d| *d == ReviewDecision::ChangesRequested)
        {
            return "changes requested".to_string();
        }
        let awaiting: Vec<&str> = self
            .requested_reviewers
            .iter()
            .filter(|r| !self.decisions.contains_key(r.as_str()))
            .map(String::as_str)
            .collect();
        if !awaiting.is_empty() {
            return format!("awaiting {}", awaiting.join(", "));
        }
        if !self.decisions.is_empty() {
            return "approved".to_string();
        }
        self.state.as_str().to_string()
    }
}

/// A milestone member, in API order. Items are cheap immutable values, so
/// milestones own their members directly.
#[derive(Debug, Clone)]
pub enum Item {
    Issue(Issue),
    PullRequest(PullRequest),
}

impl Item {
    pub fn display(&self) -> String {
        match self {
            Item::Issue(issue) => issue.display(),
            Item::PullRequest(pr) => pr.display(),
        }
    }

    pub fn number(&self) -> u64 {
        match self {
            Item::Issue(issue) => issue.number,
            Item::PullRequest(pr) => pr.number,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Item::Issue(issue) => &issue.title,
            Item::PullRequest(pr) => &pr.title,
        }
    }

    pub fn is_done(&self) -> bool {
        match self {
            Item::Issue(issue) => issue.state == ItemState::Closed,
            Item::PullRequest(pr) => pr.merged || pr.state == ItemState::Closed,
        }
    }
}

fn validate_required(record: &RawRecord) -> Result<(u64, ItemState), DashboardError> {
    let number = record.number.ok_or(DashboardError::MalformedRecord {
        number: None,
        field: "number",
    })?;
    let state = record
        .state
        .as_deref()
        .and_then(ItemState::parse)
        .ok_or(DashboardError::MalformedRecord {
            number: Some(number),
            field: "state",
        })?;
    Ok((number, state))
}

fn milestone_id(record: &RawRecord) -> Result<Option<u64>, DashboardError> {
    match &record.milestone {
        Some(milestone) => {
            let id = milestone.number.ok_or(DashboardError::MalformedRecord {
                number: record.number,
                field: "milestone.number",
            })?;
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

/// Parse a leading `[N]` story point marker off a title. Returns the
/// estimate (if any) and the title with the marker stripped.
fn parse_estimate(title: &str) -> (Option<u32>, String) {
    let trimmed = title.trim();
    if let Some(rest) = trimmed.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            if let Ok(points) = rest[..end].trim().parse::<u32>() {
                return (Some(points), rest[end + 1..].trim_start().to_string());
            }
        }
    }
    (None, trimmed.to_string())
}
