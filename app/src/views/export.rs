//! CSV export of the ticket collection.
//!
//! Every field is wrapped in double quotes regardless of content, with
//! embedded quotes doubled per RFC 4180. An unassigned ticket exports an
//! empty `Assigned To` field.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::types::{Ticket, TicketStatus};

/// Fixed header row of the export
pub const CSV_HEADER: &str =
    "ID,Title,Status,Priority,Created At,Updated At,Assigned To,Reported By,Location,Description";

/// Which subset of the collection to export
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    /// Every ticket
    #[default]
    All,
    /// Only open tickets
    Open,
    /// Only resolved tickets
    Resolved,
}

impl ExportScope {
    fn matches(self, status: TicketStatus) -> bool {
        match self {
            Self::All => true,
            Self::Open => status == TicketStatus::Open,
            Self::Resolved => status == TicketStatus::Resolved,
        }
    }
}

/// Serialize a ticket subset as CSV
///
/// One row per ticket in the fixed column order of [`CSV_HEADER`], rows
/// separated by newlines. An empty subset yields just the header.
#[must_use]
pub fn export_csv(tickets: &[Ticket], scope: ExportScope) -> String {
    let mut lines = vec![CSV_HEADER.to_string()];

    for ticket in tickets.iter().filter(|t| scope.matches(t.status)) {
        let assigned_to = ticket
            .assigned_to
            .map(|id| id.to_string())
            .unwrap_or_default();
        let fields = [
            ticket.id.to_string(),
            ticket.title.clone(),
            ticket.status.to_string(),
            ticket.priority.to_string(),
            ticket
                .created_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            ticket
                .updated_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            assigned_to,
            ticket.reported_by.to_string(),
            ticket.location.clone(),
            ticket.description.clone(),
        ];
        let row: Vec<String> = fields.iter().map(|f| quote(f)).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Wrap a field in double quotes, doubling embedded quotes
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
