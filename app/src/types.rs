//! Domain types for the accessibility ticketing core.
//!
//! Tickets, users, comments, and notifications are plain owned data shared
//! between the mock backend and the state slices. Identifiers are newtypes
//! over monotonically assigned integers; the backend owns the counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TicketId(u64);

impl TicketId {
    /// Creates a `TicketId` from a raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(u64);

impl UserId {
    /// Creates a `UserId` from a raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a comment
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommentId(u64);

impl CommentId {
    /// Creates a `CommentId` from a raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates a `NotificationId` from a raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a user account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator: triages, assigns, manages users, exports data
    Admin,
    /// Regular reporter
    User,
}

impl UserRole {
    /// Lowercase label, as rendered in lists and exports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a ticket
///
/// Variant order defines the triage sort rank: open < in-progress <
/// resolved.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    /// Reported, nobody is working on it yet
    Open,
    /// Somebody is working on it
    InProgress,
    /// Fixed or closed
    Resolved,
}

impl TicketStatus {
    /// Kebab-case label, as rendered in lists and exports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of a ticket
///
/// Variant order defines the sort rank: low < medium < high.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    /// Cosmetic or low-impact issue
    Low,
    /// Impairs some users
    Medium,
    /// Blocks assistive-technology users
    High,
}

impl TicketPriority {
    /// Lowercase label, as rendered in lists and exports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity class of a notification toast
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral information
    Info,
    /// An operation succeeded
    Success,
    /// Something needs attention
    Warning,
    /// An operation failed
    Error,
}

/// Satisfaction rating for a resolved ticket, 1 to 5
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

/// Rejected rating value outside 1..=5
#[derive(Debug, Error, PartialEq, Eq)]
#[error("rating must be between 1 and 5, got {0}")]
pub struct InvalidRating(pub u8);

impl Rating {
    /// Creates a rating, rejecting values outside 1..=5
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRating`] when `value` is 0 or greater than 5.
    pub const fn try_new(value: u8) -> Result<Self, InvalidRating> {
        if value >= 1 && value <= 5 {
            Ok(Self(value))
        } else {
            Err(InvalidRating(value))
        }
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = InvalidRating;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Account role
    pub role: UserRole,
    /// Tickets currently assigned to this user
    pub assigned_tickets: Vec<TicketId>,
}

impl User {
    /// Creates a new user with no assignments
    #[must_use]
    pub const fn new(id: UserId, name: String, email: String, role: UserRole) -> Self {
        Self {
            id,
            name,
            email,
            role,
            assigned_tickets: Vec::new(),
        }
    }
}

/// One entry in a ticket's append-only status history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// The status the ticket moved to
    pub status: TicketStatus,
    /// When the change happened
    pub changed_at: DateTime<Utc>,
    /// Who made the change
    pub changed_by: UserId,
}

/// A comment on a ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: CommentId,
    /// The ticket this comment belongs to
    pub ticket_id: TicketId,
    /// Comment author
    pub author: UserId,
    /// Text content
    pub content: String,
    /// When the comment was written
    pub created_at: DateTime<Utc>,
}

/// Submission payload for a new ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    /// Short summary of the issue
    pub title: String,
    /// Full description
    pub description: String,
    /// Where the issue was observed (page or component)
    pub location: String,
    /// Reporter-assessed priority
    pub priority: TicketPriority,
    /// Who reported the issue
    pub reported_by: UserId,
}

/// A reported accessibility issue tracked through its lifecycle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier, monotonically assigned
    pub id: TicketId,
    /// Short summary of the issue
    pub title: String,
    /// Full description
    pub description: String,
    /// Current lifecycle status
    pub status: TicketStatus,
    /// Priority
    pub priority: TicketPriority,
    /// Where the issue was observed
    pub location: String,
    /// When the ticket was submitted
    pub created_at: DateTime<Utc>,
    /// When the ticket was last mutated
    pub updated_at: DateTime<Utc>,
    /// Assignee, if triaged
    pub assigned_to: Option<UserId>,
    /// Reporter
    pub reported_by: UserId,
    /// Discussion, in creation order
    pub comments: Vec<Comment>,
    /// Satisfaction rating, set once after resolution
    pub rating: Option<Rating>,
    /// Append-only log of status transitions
    pub status_history: Vec<StatusChange>,
}

impl Ticket {
    /// Creates a ticket from a submission
    ///
    /// Status defaults to open with empty comments and history;
    /// `updated_at` starts equal to `created_at`.
    #[must_use]
    pub fn new(id: TicketId, submission: NewTicket, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: submission.title,
            description: submission.description,
            status: TicketStatus::Open,
            priority: submission.priority,
            location: submission.location,
            created_at,
            updated_at: created_at,
            assigned_to: None,
            reported_by: submission.reported_by,
            comments: Vec::new(),
            rating: None,
            status_history: Vec::new(),
        }
    }

    /// Records a status transition
    ///
    /// Appends to the history log (never replacing prior entries), updates
    /// the current status, and bumps `updated_at`.
    pub fn record_status(
        &mut self,
        status: TicketStatus,
        changed_at: DateTime<Utc>,
        changed_by: UserId,
    ) {
        self.status_history.push(StatusChange {
            status,
            changed_at,
            changed_by,
        });
        self.status = status;
        self.updated_at = changed_at;
    }
}

/// A transient notification toast
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier within the notifications slice
    pub id: NotificationId,
    /// Message shown to the user
    pub message: String,
    /// Severity class
    pub severity: Severity,
    /// When the notification was raised
    pub created_at: DateTime<Utc>,
    /// Whether the user has seen it
    pub read: bool,
}

impl Notification {
    /// Creates a new unread notification
    #[must_use]
    pub const fn new(
        id: NotificationId,
        message: String,
        severity: Severity,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            message,
            severity,
            created_at,
            read: false,
        }
    }
}
