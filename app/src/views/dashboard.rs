//! Count aggregations for the dashboard charts.

use std::collections::BTreeMap;

use crate::types::{Ticket, TicketPriority, TicketStatus};

/// Ticket count per status present in the collection
///
/// Only statuses that actually occur get an entry, matching what the charts
/// render. Keys iterate in lifecycle order.
#[must_use]
pub fn status_counts(tickets: &[Ticket]) -> BTreeMap<TicketStatus, usize> {
    let mut counts = BTreeMap::new();
    for ticket in tickets {
        *counts.entry(ticket.status).or_insert(0) += 1;
    }
    counts
}

/// Ticket count per priority present in the collection
///
/// Keys iterate in rank order (low, medium, high).
#[must_use]
pub fn priority_counts(tickets: &[Ticket]) -> BTreeMap<TicketPriority, usize> {
    let mut counts = BTreeMap::new();
    for ticket in tickets {
        *counts.entry(ticket.priority).or_insert(0) += 1;
    }
    counts
}
