use thiserror::Error;

/// Errors surfaced by the aggregation core.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A raw record was missing a required field. Terminal for the load
    /// cycle; no partial project is ever built from bad data.
    #[error("malformed record{}: missing required field `{field}`", display_number(number))]
    MalformedRecord {
        number: Option<u64>,
        field: &'static str,
    },

    /// The repository has no open milestone. Rendered as a "nothing to
    /// show" message by the sprint and changelog commands.
    #[error("no open milestone in this repository")]
    NoOpenMilestone,
}

fn display_number(number: &Option<u64>) -> String {
    match number {
        Some(n) => format!(" #{}", n),
        None => String::new(),
    }
}
