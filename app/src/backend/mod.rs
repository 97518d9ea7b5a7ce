//! The mock backend: async CRUD over in-memory collections.
//!
//! The slices never touch collections directly; they talk to a [`TicketApi`]
//! handle injected through their environments. The in-memory implementation
//! simulates request latency and always copies results out, so callers can
//! never alias its internal state.
//!
//! Lookups distinguish "not found" (`Ok(None)`) from operational failure
//! (`Err`). Mutations addressed at a missing entity return an explicit
//! [`BackendError`] instead of fabricating a result.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{
    Comment, CommentId, NewTicket, Rating, Ticket, TicketId, TicketStatus, User, UserId, UserRole,
};

mod memory;

pub use memory::InMemoryBackend;

/// Errors surfaced by backend operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// A mutation addressed a ticket that does not exist
    #[error("ticket {0} not found")]
    TicketNotFound(TicketId),

    /// A mutation addressed a comment that does not exist
    #[error("comment {0} not found")]
    CommentNotFound(CommentId),

    /// A mutation addressed a user that does not exist
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// The backend could not be reached or failed mid-operation
    ///
    /// Never produced by [`InMemoryBackend`]; exists so alternative
    /// implementations (and failure-path tests) have a generic error.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Async CRUD operations consumed by the state slices
///
/// Every operation returns the full updated entity (or nothing for pure
/// deletions), copied out of the backend's collections.
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// List all tickets
    async fn list_tickets(&self) -> Result<Vec<Ticket>, BackendError>;

    /// Fetch one ticket; `Ok(None)` when the id is unknown
    async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, BackendError>;

    /// List all users
    async fn list_users(&self) -> Result<Vec<User>, BackendError>;

    /// Fetch one user; `Ok(None)` when the id is unknown
    async fn get_user(&self, id: UserId) -> Result<Option<User>, BackendError>;

    /// Create a ticket from a submission
    ///
    /// The ticket gets a fresh monotonic id, status open, empty comments and
    /// history, and `created_at == updated_at`.
    async fn create_ticket(&self, submission: NewTicket) -> Result<Ticket, BackendError>;

    /// Create a user with a fresh monotonic id and no assignments
    async fn create_user(
        &self,
        name: String,
        email: String,
        role: UserRole,
    ) -> Result<User, BackendError>;

    /// Move a ticket to a new status
    ///
    /// Appends a status change to the history and bumps `updated_at`.
    /// `Ok(None)` when the ticket id is unknown.
    async fn set_status(
        &self,
        id: TicketId,
        status: TicketStatus,
        actor: UserId,
    ) -> Result<Option<Ticket>, BackendError>;

    /// Assign a user to a ticket
    ///
    /// Sets the ticket's assignee and appends the ticket to the user's
    /// assignment list. `Ok(None)` when either id is unknown.
    async fn assign(
        &self,
        ticket_id: TicketId,
        user_id: UserId,
    ) -> Result<Option<Ticket>, BackendError>;

    /// Add a comment to a ticket
    ///
    /// # Errors
    ///
    /// [`BackendError::TicketNotFound`] when the ticket id is unknown.
    async fn add_comment(
        &self,
        ticket_id: TicketId,
        author: UserId,
        content: String,
    ) -> Result<Comment, BackendError>;

    /// Edit an existing comment's content
    ///
    /// # Errors
    ///
    /// [`BackendError::TicketNotFound`] or [`BackendError::CommentNotFound`]
    /// when the target does not exist.
    async fn edit_comment(
        &self,
        ticket_id: TicketId,
        comment_id: CommentId,
        content: String,
    ) -> Result<Comment, BackendError>;

    /// Delete a comment from its ticket
    ///
    /// A missing ticket or comment is a silent no-op.
    async fn delete_comment(
        &self,
        ticket_id: TicketId,
        comment_id: CommentId,
    ) -> Result<(), BackendError>;

    /// Record a satisfaction rating for a ticket
    ///
    /// The free-text feedback is accepted but not persisted. A missing
    /// ticket is a silent no-op.
    async fn set_rating(
        &self,
        ticket_id: TicketId,
        rating: Rating,
        feedback: String,
    ) -> Result<(), BackendError>;
}
