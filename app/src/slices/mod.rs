//! State slices mirroring server data.
//!
//! Each slice is a reducer over one resource type: tickets, users, and
//! notifications. A slice tracks the request lifecycle of its collection and
//! applies completion actions produced by backend effects.
//!
//! Failure handling is uniform: every backend error is caught at the effect
//! boundary, converted to a display string, and carried by a failure action.
//! Nothing is retried automatically and nothing panics the caller.

use serde::{Deserialize, Serialize};

pub mod notifications;
pub mod tickets;
pub mod users;

/// Request lifecycle of a slice's collection
///
/// Transitions: idle → loading on request start, loading → succeeded with a
/// payload, loading → failed with an error message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// No request issued yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request completed with data
    Succeeded,
    /// The last request failed
    Failed,
}
