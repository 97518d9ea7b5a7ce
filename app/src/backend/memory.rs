//! In-memory backend with simulated latency.

use std::sync::Arc;
use std::time::Duration;

use accesstrack_core::environment::Clock;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{BackendError, TicketApi};
use crate::types::{
    Comment, CommentId, NewTicket, Rating, Ticket, TicketId, TicketStatus, User, UserId, UserRole,
};
use async_trait::async_trait;

/// The backing collections and id counters
struct Db {
    tickets: Vec<Ticket>,
    users: Vec<User>,
    next_ticket_id: u64,
    next_user_id: u64,
    next_comment_id: u64,
}

impl Db {
    const fn empty() -> Self {
        Self {
            tickets: Vec::new(),
            users: Vec::new(),
            next_ticket_id: 1,
            next_user_id: 1,
            next_comment_id: 1,
        }
    }

    fn take_ticket_id(&mut self) -> TicketId {
        let id = TicketId::new(self.next_ticket_id);
        self.next_ticket_id += 1;
        id
    }

    fn take_user_id(&mut self) -> UserId {
        let id = UserId::new(self.next_user_id);
        self.next_user_id += 1;
        id
    }

    fn take_comment_id(&mut self) -> CommentId {
        let id = CommentId::new(self.next_comment_id);
        self.next_comment_id += 1;
        id
    }

    fn ticket_mut(&mut self, id: TicketId) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == id)
    }
}

/// Mock backend holding tickets and users in memory
///
/// Constructed once per process (or per test) and injected into the slice
/// environments as an `Arc<dyn TicketApi>`. Every operation sleeps for the
/// configured latency before touching the collections, mimicking a remote
/// service, and clones results out so the internal state is never aliased.
pub struct InMemoryBackend {
    latency: Duration,
    clock: Arc<dyn Clock>,
    db: Mutex<Db>,
}

impl InMemoryBackend {
    /// Creates a backend pre-seeded with the demo users and tickets
    #[must_use]
    pub fn new(latency: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            latency,
            clock,
            db: Mutex::new(seeded_db()),
        }
    }

    /// Creates a backend with empty collections
    #[must_use]
    pub fn empty(latency: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            latency,
            clock,
            db: Mutex::new(Db::empty()),
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

#[async_trait]
impl TicketApi for InMemoryBackend {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, BackendError> {
        self.simulate_latency().await;
        let db = self.db.lock().await;
        Ok(db.tickets.clone())
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, BackendError> {
        self.simulate_latency().await;
        let db = self.db.lock().await;
        Ok(db.tickets.iter().find(|t| t.id == id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, BackendError> {
        self.simulate_latency().await;
        let db = self.db.lock().await;
        Ok(db.users.clone())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, BackendError> {
        self.simulate_latency().await;
        let db = self.db.lock().await;
        Ok(db.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_ticket(&self, submission: NewTicket) -> Result<Ticket, BackendError> {
        self.simulate_latency().await;
        let now = self.now();
        let mut db = self.db.lock().await;
        let id = db.take_ticket_id();
        let ticket = Ticket::new(id, submission, now);
        tracing::debug!(ticket_id = %id, "Ticket created");
        db.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn create_user(
        &self,
        name: String,
        email: String,
        role: UserRole,
    ) -> Result<User, BackendError> {
        self.simulate_latency().await;
        let mut db = self.db.lock().await;
        let id = db.take_user_id();
        let user = User::new(id, name, email, role);
        tracing::debug!(user_id = %id, "User created");
        db.users.push(user.clone());
        Ok(user)
    }

    async fn set_status(
        &self,
        id: TicketId,
        status: TicketStatus,
        actor: UserId,
    ) -> Result<Option<Ticket>, BackendError> {
        self.simulate_latency().await;
        let now = self.now();
        let mut db = self.db.lock().await;
        let Some(ticket) = db.ticket_mut(id) else {
            return Ok(None);
        };
        ticket.record_status(status, now, actor);
        tracing::debug!(ticket_id = %id, status = %status, "Ticket status changed");
        Ok(Some(ticket.clone()))
    }

    async fn assign(
        &self,
        ticket_id: TicketId,
        user_id: UserId,
    ) -> Result<Option<Ticket>, BackendError> {
        self.simulate_latency().await;
        let now = self.now();
        let mut db = self.db.lock().await;
        let db = &mut *db;

        let Some(ticket) = db.tickets.iter_mut().find(|t| t.id == ticket_id) else {
            return Ok(None);
        };
        let Some(user) = db.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };

        ticket.assigned_to = Some(user_id);
        ticket.updated_at = now;
        if !user.assigned_tickets.contains(&ticket_id) {
            user.assigned_tickets.push(ticket_id);
        }
        tracing::debug!(ticket_id = %ticket_id, user_id = %user_id, "Ticket assigned");
        Ok(Some(ticket.clone()))
    }

    async fn add_comment(
        &self,
        ticket_id: TicketId,
        author: UserId,
        content: String,
    ) -> Result<Comment, BackendError> {
        self.simulate_latency().await;
        let now = self.now();
        let mut db = self.db.lock().await;
        let id = db.take_comment_id();
        let Some(ticket) = db.ticket_mut(ticket_id) else {
            return Err(BackendError::TicketNotFound(ticket_id));
        };
        let comment = Comment {
            id,
            ticket_id,
            author,
            content,
            created_at: now,
        };
        ticket.comments.push(comment.clone());
        ticket.updated_at = now;
        Ok(comment)
    }

    async fn edit_comment(
        &self,
        ticket_id: TicketId,
        comment_id: CommentId,
        content: String,
    ) -> Result<Comment, BackendError> {
        self.simulate_latency().await;
        let mut db = self.db.lock().await;
        let Some(ticket) = db.ticket_mut(ticket_id) else {
            return Err(BackendError::TicketNotFound(ticket_id));
        };
        let Some(comment) = ticket.comments.iter_mut().find(|c| c.id == comment_id) else {
            return Err(BackendError::CommentNotFound(comment_id));
        };
        comment.content = content;
        Ok(comment.clone())
    }

    async fn delete_comment(
        &self,
        ticket_id: TicketId,
        comment_id: CommentId,
    ) -> Result<(), BackendError> {
        self.simulate_latency().await;
        let mut db = self.db.lock().await;
        if let Some(ticket) = db.ticket_mut(ticket_id) {
            ticket.comments.retain(|c| c.id != comment_id);
        }
        Ok(())
    }

    async fn set_rating(
        &self,
        ticket_id: TicketId,
        rating: Rating,
        feedback: String,
    ) -> Result<(), BackendError> {
        self.simulate_latency().await;
        let now = self.now();
        let mut db = self.db.lock().await;
        if let Some(ticket) = db.ticket_mut(ticket_id) {
            ticket.rating = Some(rating);
            ticket.updated_at = now;
            // Feedback is accepted but not stored anywhere
            tracing::debug!(ticket_id = %ticket_id, rating = %rating, feedback = %feedback, "Rating recorded");
        }
        Ok(())
    }
}

/// The demo dataset the application starts with
#[allow(clippy::expect_used)] // hardcoded timestamps always parse
fn seeded_db() -> Db {
    fn ts(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }

    let users = vec![
        User {
            id: UserId::new(1),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            role: UserRole::Admin,
            assigned_tickets: vec![TicketId::new(1)],
        },
        User {
            id: UserId::new(2),
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            role: UserRole::User,
            assigned_tickets: vec![TicketId::new(2)],
        },
    ];

    let tickets = vec![
        Ticket {
            id: TicketId::new(1),
            title: "Missing alt text on homepage images".to_string(),
            description: "The images on the homepage do not have alt text, making them \
                          inaccessible to screen readers."
                .to_string(),
            status: TicketStatus::Open,
            priority: crate::types::TicketPriority::High,
            location: "Homepage".to_string(),
            created_at: ts("2023-06-01T12:00:00Z"),
            updated_at: ts("2023-06-01T12:00:00Z"),
            assigned_to: Some(UserId::new(1)),
            reported_by: UserId::new(2),
            comments: Vec::new(),
            rating: None,
            status_history: Vec::new(),
        },
        Ticket {
            id: TicketId::new(2),
            title: "Low color contrast in navigation menu".to_string(),
            description: "The navigation menu has low color contrast, making it difficult to \
                          read for users with visual impairments."
                .to_string(),
            status: TicketStatus::InProgress,
            priority: crate::types::TicketPriority::Medium,
            location: "Global navigation".to_string(),
            created_at: ts("2023-06-02T14:30:00Z"),
            updated_at: ts("2023-06-03T10:15:00Z"),
            assigned_to: Some(UserId::new(2)),
            reported_by: UserId::new(1),
            comments: Vec::new(),
            rating: None,
            status_history: Vec::new(),
        },
    ];

    Db {
        tickets,
        users,
        next_ticket_id: 3,
        next_user_id: 3,
        next_comment_id: 1,
    }
}
