mod issue;
mod milestone;

pub use issue::{Issue, Item, ItemState, PullRequest, ReviewDecision};
pub use milestone::Milestone;

use crate::error::DashboardError;
use crate::github::models::RawRecord;

/// The full item set for one repository plus the derived milestone index.
///
/// Built once per load cycle and immutable afterwards; a refresh replaces
/// the whole value rather than mutating it in place.
#[derive(Debug)]
pub struct Project {
    issues: Vec<Issue>,
    pull_requests: Vec<PullRequest>,
    /// First-seen order; sprint ordering is derived on query.
    milestones: Vec<Milestone>,
}

impl Project {
    /// Build the project from the flat record list delivered by the loader.
    ///
    /// Fails fast on the first malformed record; callers never see a
    /// partially built project.
    pub fn from_records(records: &[RawRecord]) -> Result<Self, DashboardError> {
        let mut project = Project {
            issues: Vec::new(),
            pull_requests: Vec::new(),
            milestones: Vec::new(),
        };

        for record in records {
            let item = if record.is_pull_request() {
                let pr = PullRequest::from_raw(record)?;
                project.pull_requests.push(pr.clone());
                Item::PullRequest(pr)
            } else {
                let issue = Issue::from_raw(record)?;
                project.issues.push(issue.clone());
                Item::Issue(issue)
            };

            if let Some(raw_milestone) = &record.milestone {
                let id = raw_milestone.number.ok_or(DashboardError::MalformedRecord {
                    number: record.number,
                    field: "milestone.number",
                })?;
                let position = match project.milestones.iter().position(|m| m.id == id) {
                    Some(position) => position,
                    None => {
                        project.milestones.push(Milestone::from_raw(raw_milestone)?);
                        project.milestones.len() - 1
                    }
                };
                project.milestones[position].push(item);
            }
        }

        Ok(project)
    }

    /// The milestone currently treated as in progress: the open milestone
    /// with the nearest due date (undated milestones sort last, ties break
    /// by first-seen order).
    pub fn current_milestone(&self) -> Result<&Milestone, DashboardError> {
        self.sprints()
            .into_iter()
            .next()
            .ok_or(DashboardError::NoOpenMilestone)
    }

    /// All open milestones, due date ascending, undated last.
    pub fn sprints(&self) -> Vec<&Milestone> {
        let mut open: Vec<&Milestone> = self.milestones.iter().filter(|m| m.is_open()).collect();
        // Stable sort keeps first-seen order for ties and undated milestones
        open.sort_by_key(|m| (m.due_on.is_none(), m.due_on));
        open
    }

    /// Open milestones other than the current sprint.
    pub fn backlogs(&self) -> Vec<&Milestone> {
        self.sprints().into_iter().skip(1).collect()
    }

    /// Pull requests where `user` has been asked to review and has not yet
    /// submitted a decision, in original fetch order.
    pub fn pull_requests_awaiting_review(&self, user: &str) -> Vec<&PullRequest> {
        self.pull_requests
            .iter()
            .filter(|pr| pr.is_awaiting_review(user))
            .collect()
    }

    /// Open issues with no story point estimate. Pull requests are never
    /// estimated, so they are excluded by construction.
    pub fn issues_missing_estimation(&self) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.state == ItemState::Open && issue.estimate.is_none())
            .collect()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn pull_request_count(&self) -> usize {
        self.pull_requests.len()
    }
}
