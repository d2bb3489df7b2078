use jiff::civil::Date;

use crate::error::DashboardError;
use crate::github::models::RawMilestone;
use crate::project::issue::{Item, ItemState};

/// A milestone and its member items, in the order the API delivered them.
#[derive(Debug, Clone)]
pub struct Milestone {
    pub id: u64,
    pub title: String,
    pub state: ItemState,
    pub due_on: Option<Date>,
    items: Vec<Item>,
}

impl Milestone {
    /// Build an empty milestone from its raw header.
    pub fn from_raw(raw: &RawMilestone) -> Result<Self, DashboardError> {
        let id = raw.number.ok_or(DashboardError::MalformedRecord {
            number: None,
            field: "milestone.number",
        })?;
        let title = raw.title.clone().ok_or(DashboardError::MalformedRecord {
            number: Some(id),
            field: "milestone.title",
        })?;
        let state = match raw.state.as_deref() {
            Some("open") => ItemState::Open,
            Some("closed") => ItemState::Closed,
            _ => {
                return Err(DashboardError::MalformedRecord {
                    number: Some(id),
                    field: "milestone.state",
                })
            }
        };

        Ok(Milestone {
            id,
            title,
            state,
            due_on: raw.due_on.as_deref().and_then(parse_due_date),
            items: Vec::new(),
        })
    }

    pub(crate) fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn is_open(&self) -> bool {
        self.state == ItemState::Open
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Milestone header plus one line per member, in insertion order.
    pub fn display(&self) -> String {
        let done = self.items.iter().filter(|i| i.is_done()).count();
        let mut lines = vec![format!(
            "## {}{} ({}/{} done)",
            self.title,
            match &self.due_on {
                Some(date) => format!(", due {}", date),
                None => String::new(),
            },
            done,
            self.items.len()
        )];
        lines.extend(self.items.iter().map(|item| item.display()));
        lines.join("\n")
    }

    /// Markdown changelog of shipped work: merged pull requests and closed
    /// issues, suitable for pasting into release notes.
    pub fn display_changelog(&self) -> String {
        let merged: Vec<&Item> = self
            .items
            .iter()
            .filter(|i| matches!(i, Item::PullRequest(pr) if pr.merged))
            .collect();
        let closed: Vec<&Item> = self
            .items
            .iter()
            .filter(|i| matches!(i, Item::Issue(issue) if issue.state == ItemState::Closed))
            .collect();

        let mut sections = vec![format!("# {}", self.title)];

        if merged.is_empty() && closed.is_empty() {
            sections.push("No shipped changes yet.".to_string());
            return sections.join("\n\n");
        }

        if !merged.is_empty() {
            let mut lines = vec!["## Merged pull requests".to_string()];
            for item in merged {
                lines.push(changelog_line(item));
            }
            sections.push(lines.join("\n"));
        }
        if !closed.is_empty() {
            let mut lines = vec!["## Closed issues".to_string()];
            for item in closed {
                lines.push(changelog_line(item));
            }
            sections.push(lines.join("\n"));
        }

        sections.join("\n\n")
    }
}

fn changelog_line(item: &Item) -> String {
    format!("- {} (#{})", item.title(), item.number())
}

/// Due dates arrive as RFC 3339 timestamps; only the calendar date matters
/// for sprint ordering.
fn parse_due_date(due_on: &str) -> Option<Date> {
    due_on.get(..10)?.parse().ok()
}
