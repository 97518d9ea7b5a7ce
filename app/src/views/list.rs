//! Filtering and sorting for the ticket list.

use serde::{Deserialize, Serialize};

use crate::types::{Ticket, TicketStatus};

/// Status predicate of a [`TicketQuery`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    /// Match every status
    #[default]
    All,
    /// Match exactly one status
    Only(TicketStatus),
}

impl StatusFilter {
    fn matches(self, status: TicketStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => status == wanted,
        }
    }
}

/// Sort key of a [`TicketQuery`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    /// Creation timestamp
    #[default]
    CreatedAt,
    /// Priority rank: low < medium < high
    Priority,
    /// Status rank: open < in-progress < resolved
    Status,
}

/// Sort direction of a [`TicketQuery`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first
    Ascending,
    /// Largest first; the list page default
    #[default]
    Descending,
}

/// Filter and sort parameters for the ticket list
///
/// The predicate is a case-insensitive substring match on title OR location,
/// AND the status filter. Sorting is stable: tickets comparing equal keep
/// their input order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketQuery {
    /// Search term matched against title and location
    pub search: String,
    /// Status predicate
    pub status: StatusFilter,
    /// Sort key
    pub sort_field: SortField,
    /// Sort direction
    pub sort_order: SortOrder,
}

impl TicketQuery {
    /// Does one ticket satisfy the search term and status filter?
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = ticket.title.to_lowercase().contains(&term)
            || ticket.location.to_lowercase().contains(&term);
        matches_search && self.status.matches(ticket.status)
    }

    /// Filter and sort a ticket collection for display
    #[must_use]
    pub fn apply<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        let mut filtered: Vec<&Ticket> = tickets.iter().filter(|t| self.matches(t)).collect();

        filtered.sort_by(|a, b| {
            let ordering = match self.sort_field {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::Priority => a.priority.cmp(&b.priority),
                SortField::Status => a.status.cmp(&b.status),
            };
            match self.sort_order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });

        filtered
    }
}
