//! The tickets slice: collection state, request lifecycle, and the
//! reducer driving every ticket mutation through the backend.

use std::sync::Arc;

use accesstrack_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

use super::RequestStatus;
use crate::backend::TicketApi;
use crate::types::{
    Comment, CommentId, NewTicket, Rating, Ticket, TicketId, TicketStatus, UserId,
};

/// Environment dependencies for the tickets reducer
#[derive(Clone)]
pub struct TicketsEnvironment {
    /// Backend handle shared with the other slices
    pub api: Arc<dyn TicketApi>,
}

impl TicketsEnvironment {
    /// Creates a new `TicketsEnvironment`
    #[must_use]
    pub fn new(api: Arc<dyn TicketApi>) -> Self {
        Self { api }
    }
}

/// State of the tickets slice
#[derive(Clone, Debug, Default)]
pub struct TicketsState {
    /// The mirrored ticket collection
    pub tickets: Vec<Ticket>,
    /// Lifecycle of the collection fetch
    pub status: RequestStatus,
    /// Last failure, as a display string
    pub error: Option<String>,
}

impl TicketsState {
    /// Creates an empty slice state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a ticket by id
    #[must_use]
    pub fn get(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }
}

/// Actions processed by the tickets reducer
///
/// Commands describe user intent and produce backend effects; completions
/// carry the backend's answer back into state; failures carry a display
/// string.
#[derive(Clone, Debug)]
pub enum TicketsAction {
    // ========== Commands ==========
    /// Command: load the full ticket collection
    FetchTickets,
    /// Command: load one ticket (upserted into the collection)
    FetchTicket {
        /// Ticket to load
        id: TicketId,
    },
    /// Command: submit a new ticket
    SubmitTicket {
        /// The submission payload
        submission: NewTicket,
    },
    /// Command: move a ticket to a new status
    UpdateStatus {
        /// Target ticket
        ticket_id: TicketId,
        /// New status
        status: TicketStatus,
        /// Who is making the change
        actor: UserId,
    },
    /// Command: assign a user to a ticket
    AssignUser {
        /// Target ticket
        ticket_id: TicketId,
        /// Assignee
        user_id: UserId,
    },
    /// Command: add a comment to a ticket
    AddComment {
        /// Target ticket
        ticket_id: TicketId,
        /// Comment author
        author: UserId,
        /// Comment text
        content: String,
    },
    /// Command: edit a comment's text
    EditComment {
        /// Parent ticket
        ticket_id: TicketId,
        /// Comment to edit
        comment_id: CommentId,
        /// Replacement text
        content: String,
    },
    /// Command: delete a comment
    DeleteComment {
        /// Parent ticket
        ticket_id: TicketId,
        /// Comment to delete
        comment_id: CommentId,
    },
    /// Command: record a satisfaction rating
    SubmitRating {
        /// Target ticket
        ticket_id: TicketId,
        /// The rating, already validated at construction
        rating: Rating,
        /// Free-text feedback, forwarded but not persisted
        feedback: String,
    },

    // ========== Completions ==========
    /// The full collection arrived
    TicketsLoaded {
        /// Fresh collection replacing the mirror
        tickets: Vec<Ticket>,
    },
    /// A single ticket arrived; upserted into the collection
    TicketLoaded {
        /// The fetched ticket
        ticket: Ticket,
    },
    /// A submission was accepted
    TicketSubmitted {
        /// The created ticket
        ticket: Ticket,
    },
    /// A status change or assignment completed
    TicketUpdated {
        /// The updated ticket, replacing the mirrored copy
        ticket: Ticket,
    },
    /// A comment was added
    CommentAdded {
        /// Parent ticket
        ticket_id: TicketId,
        /// The new comment
        comment: Comment,
    },
    /// A comment was edited
    CommentEdited {
        /// Parent ticket
        ticket_id: TicketId,
        /// The edited comment
        comment: Comment,
    },
    /// A comment was deleted
    CommentDeleted {
        /// Parent ticket
        ticket_id: TicketId,
        /// The removed comment's id
        comment_id: CommentId,
    },
    /// A rating was recorded
    RatingSubmitted {
        /// Target ticket
        ticket_id: TicketId,
        /// The recorded rating
        rating: Rating,
    },

    // ========== Failures ==========
    /// The collection fetch failed; drives the lifecycle to `Failed`
    LoadFailed {
        /// Display string for the toast
        message: String,
    },
    /// A targeted operation failed; the collection stays usable
    OperationFailed {
        /// Display string for the toast
        message: String,
    },
    /// A command was rejected before reaching the backend
    ValidationFailed {
        /// Display string for the form
        message: String,
    },
}

/// Reducer for the tickets slice
#[derive(Clone, Copy, Debug, Default)]
pub struct TicketsReducer;

impl TicketsReducer {
    /// Creates a new `TicketsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_submission(submission: &NewTicket) -> Result<(), String> {
        if submission.title.trim().is_empty() {
            return Err("Ticket title cannot be empty".to_string());
        }
        if submission.description.trim().is_empty() {
            return Err("Ticket description cannot be empty".to_string());
        }
        if submission.location.trim().is_empty() {
            return Err("Ticket location cannot be empty".to_string());
        }
        Ok(())
    }

    /// Replace-by-id-or-append
    fn upsert(tickets: &mut Vec<Ticket>, ticket: Ticket) {
        if let Some(slot) = tickets.iter_mut().find(|t| t.id == ticket.id) {
            *slot = ticket;
        } else {
            tickets.push(ticket);
        }
    }

    /// Replace only when the ticket is already mirrored
    fn replace_existing(tickets: &mut [Ticket], ticket: Ticket) {
        if let Some(slot) = tickets.iter_mut().find(|t| t.id == ticket.id) {
            *slot = ticket;
        }
    }
}

impl Reducer for TicketsReducer {
    type State = TicketsState;
    type Action = TicketsAction;
    type Environment = TicketsEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TicketsAction::FetchTickets => {
                state.status = RequestStatus::Loading;
                state.error = None;
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.list_tickets().await {
                        Ok(tickets) => Some(TicketsAction::TicketsLoaded { tickets }),
                        Err(error) => {
                            tracing::error!(%error, "Fetching tickets failed");
                            Some(TicketsAction::LoadFailed {
                                message: "Failed to fetch tickets. Please try again later."
                                    .to_string(),
                            })
                        },
                    }
                })]
            },

            TicketsAction::FetchTicket { id } => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.get_ticket(id).await {
                        Ok(Some(ticket)) => Some(TicketsAction::TicketLoaded { ticket }),
                        Ok(None) => {
                            tracing::error!(ticket_id = %id, "Ticket not found");
                            Some(TicketsAction::OperationFailed {
                                message:
                                    "Failed to fetch ticket details. Please try again later."
                                        .to_string(),
                            })
                        },
                        Err(error) => {
                            tracing::error!(%error, ticket_id = %id, "Fetching ticket failed");
                            Some(TicketsAction::OperationFailed {
                                message:
                                    "Failed to fetch ticket details. Please try again later."
                                        .to_string(),
                            })
                        },
                    }
                })]
            },

            TicketsAction::SubmitTicket { submission } => {
                if let Err(message) = Self::validate_submission(&submission) {
                    state.error = Some(message);
                    return smallvec![];
                }
                state.error = None;
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.create_ticket(submission).await {
                        Ok(ticket) => Some(TicketsAction::TicketSubmitted { ticket }),
                        Err(error) => {
                            tracing::error!(%error, "Submitting ticket failed");
                            Some(TicketsAction::OperationFailed {
                                message: "Failed to submit ticket. Please try again later."
                                    .to_string(),
                            })
                        },
                    }
                })]
            },

            TicketsAction::UpdateStatus {
                ticket_id,
                status,
                actor,
            } => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.set_status(ticket_id, status, actor).await {
                        Ok(Some(ticket)) => Some(TicketsAction::TicketUpdated { ticket }),
                        Ok(None) => {
                            tracing::error!(ticket_id = %ticket_id, "Ticket not found for status update");
                            Some(TicketsAction::OperationFailed {
                                message:
                                    "Failed to update ticket status. Please try again later."
                                        .to_string(),
                            })
                        },
                        Err(error) => {
                            tracing::error!(%error, ticket_id = %ticket_id, status = %status, "Updating ticket status failed");
                            Some(TicketsAction::OperationFailed {
                                message:
                                    "Failed to update ticket status. Please try again later."
                                        .to_string(),
                            })
                        },
                    }
                })]
            },

            TicketsAction::AssignUser { ticket_id, user_id } => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.assign(ticket_id, user_id).await {
                        Ok(Some(ticket)) => Some(TicketsAction::TicketUpdated { ticket }),
                        Ok(None) => {
                            tracing::error!(ticket_id = %ticket_id, user_id = %user_id, "Assignment target not found");
                            Some(TicketsAction::OperationFailed {
                                message:
                                    "Failed to assign user to ticket. Please try again later."
                                        .to_string(),
                            })
                        },
                        Err(error) => {
                            tracing::error!(%error, ticket_id = %ticket_id, user_id = %user_id, "Assigning user failed");
                            Some(TicketsAction::OperationFailed {
                                message:
                                    "Failed to assign user to ticket. Please try again later."
                                        .to_string(),
                            })
                        },
                    }
                })]
            },

            TicketsAction::AddComment {
                ticket_id,
                author,
                content,
            } => {
                if content.trim().is_empty() {
                    state.error = Some("Comment cannot be empty".to_string());
                    return smallvec![];
                }
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.add_comment(ticket_id, author, content).await {
                        Ok(comment) => Some(TicketsAction::CommentAdded { ticket_id, comment }),
                        Err(error) => {
                            tracing::error!(%error, ticket_id = %ticket_id, "Adding comment failed");
                            Some(TicketsAction::OperationFailed {
                                message: "Failed to add comment. Please try again later."
                                    .to_string(),
                            })
                        },
                    }
                })]
            },

            TicketsAction::EditComment {
                ticket_id,
                comment_id,
                content,
            } => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.edit_comment(ticket_id, comment_id, content).await {
                        Ok(comment) => Some(TicketsAction::CommentEdited { ticket_id, comment }),
                        Err(error) => {
                            tracing::error!(%error, ticket_id = %ticket_id, comment_id = %comment_id, "Editing comment failed");
                            Some(TicketsAction::OperationFailed {
                                message: "Failed to edit comment. Please try again later."
                                    .to_string(),
                            })
                        },
                    }
                })]
            },

            TicketsAction::DeleteComment {
                ticket_id,
                comment_id,
            } => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.delete_comment(ticket_id, comment_id).await {
                        Ok(()) => Some(TicketsAction::CommentDeleted {
                            ticket_id,
                            comment_id,
                        }),
                        Err(error) => {
                            tracing::error!(%error, ticket_id = %ticket_id, comment_id = %comment_id, "Deleting comment failed");
                            Some(TicketsAction::OperationFailed {
                                message: "Failed to delete comment. Please try again later."
                                    .to_string(),
                            })
                        },
                    }
                })]
            },

            TicketsAction::SubmitRating {
                ticket_id,
                rating,
                feedback,
            } => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.set_rating(ticket_id, rating, feedback).await {
                        Ok(()) => Some(TicketsAction::RatingSubmitted { ticket_id, rating }),
                        Err(error) => {
                            tracing::error!(%error, ticket_id = %ticket_id, "Submitting rating failed");
                            Some(TicketsAction::OperationFailed {
                                message: "Failed to submit rating. Please try again later."
                                    .to_string(),
                            })
                        },
                    }
                })]
            },

            // ========== Completions ==========
            TicketsAction::TicketsLoaded { tickets } => {
                state.status = RequestStatus::Succeeded;
                state.tickets = tickets;
                state.error = None;
                smallvec![]
            },

            TicketsAction::TicketLoaded { ticket }
            | TicketsAction::TicketSubmitted { ticket } => {
                Self::upsert(&mut state.tickets, ticket);
                state.error = None;
                smallvec![]
            },

            TicketsAction::TicketUpdated { ticket } => {
                Self::replace_existing(&mut state.tickets, ticket);
                state.error = None;
                smallvec![]
            },

            TicketsAction::CommentAdded { ticket_id, comment } => {
                if let Some(ticket) = state.tickets.iter_mut().find(|t| t.id == ticket_id) {
                    ticket.comments.push(comment);
                }
                state.error = None;
                smallvec![]
            },

            TicketsAction::CommentEdited { ticket_id, comment } => {
                if let Some(ticket) = state.tickets.iter_mut().find(|t| t.id == ticket_id) {
                    if let Some(slot) = ticket.comments.iter_mut().find(|c| c.id == comment.id) {
                        *slot = comment;
                    }
                }
                state.error = None;
                smallvec![]
            },

            TicketsAction::CommentDeleted {
                ticket_id,
                comment_id,
            } => {
                if let Some(ticket) = state.tickets.iter_mut().find(|t| t.id == ticket_id) {
                    ticket.comments.retain(|c| c.id != comment_id);
                }
                state.error = None;
                smallvec![]
            },

            TicketsAction::RatingSubmitted { ticket_id, rating } => {
                if let Some(ticket) = state.tickets.iter_mut().find(|t| t.id == ticket_id) {
                    ticket.rating = Some(rating);
                }
                state.error = None;
                smallvec![]
            },

            // ========== Failures ==========
            TicketsAction::LoadFailed { message } => {
                state.status = RequestStatus::Failed;
                state.error = Some(message);
                smallvec![]
            },

            TicketsAction::OperationFailed { message }
            | TicketsAction::ValidationFailed { message } => {
                state.error = Some(message);
                smallvec![]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::types::TicketPriority;
    use accesstrack_testing::{ReducerTest, assertions, test_clock};
    use chrono::Utc;
    use std::time::Duration;

    fn test_env() -> TicketsEnvironment {
        TicketsEnvironment::new(Arc::new(InMemoryBackend::empty(
            Duration::ZERO,
            Arc::new(test_clock()),
        )))
    }

    fn sample_ticket(id: u64) -> Ticket {
        Ticket::new(
            TicketId::new(id),
            NewTicket {
                title: format!("Ticket {id}"),
                description: "Some description".to_string(),
                location: "Homepage".to_string(),
                priority: TicketPriority::Medium,
                reported_by: UserId::new(1),
            },
            Utc::now(),
        )
    }

    #[test]
    fn fetch_tickets_enters_loading() {
        ReducerTest::new(TicketsReducer::new())
            .with_env(test_env())
            .given_state(TicketsState::new())
            .when_action(TicketsAction::FetchTickets)
            .then_state(|state| {
                assert_eq!(state.status, RequestStatus::Loading);
                assert!(state.error.is_none());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn tickets_loaded_replaces_collection() {
        ReducerTest::new(TicketsReducer::new())
            .with_env(test_env())
            .given_state(TicketsState {
                tickets: vec![sample_ticket(1)],
                status: RequestStatus::Loading,
                error: None,
            })
            .when_action(TicketsAction::TicketsLoaded {
                tickets: vec![sample_ticket(2), sample_ticket(3)],
            })
            .then_state(|state| {
                assert_eq!(state.status, RequestStatus::Succeeded);
                assert_eq!(state.tickets.len(), 2);
                assert!(state.get(TicketId::new(1)).is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn ticket_loaded_upserts() {
        let mut updated = sample_ticket(1);
        updated.title = "Renamed".to_string();

        ReducerTest::new(TicketsReducer::new())
            .with_env(test_env())
            .given_state(TicketsState {
                tickets: vec![sample_ticket(1)],
                status: RequestStatus::Succeeded,
                error: None,
            })
            .when_action(TicketsAction::TicketLoaded { ticket: updated })
            .when_action(TicketsAction::TicketLoaded {
                ticket: sample_ticket(9),
            })
            .then_state(|state| {
                assert_eq!(state.tickets.len(), 2);
                assert_eq!(state.get(TicketId::new(1)).unwrap().title, "Renamed");
                assert!(state.get(TicketId::new(9)).is_some());
            })
            .run();
    }

    #[test]
    fn ticket_updated_never_appends() {
        ReducerTest::new(TicketsReducer::new())
            .with_env(test_env())
            .given_state(TicketsState::new())
            .when_action(TicketsAction::TicketUpdated {
                ticket: sample_ticket(5),
            })
            .then_state(|state| assert!(state.tickets.is_empty()))
            .run();
    }

    #[test]
    fn load_failure_drives_lifecycle_to_failed() {
        ReducerTest::new(TicketsReducer::new())
            .with_env(test_env())
            .given_state(TicketsState {
                tickets: Vec::new(),
                status: RequestStatus::Loading,
                error: None,
            })
            .when_action(TicketsAction::LoadFailed {
                message: "Failed to fetch tickets. Please try again later.".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.status, RequestStatus::Failed);
                assert!(state.error.as_deref().unwrap().contains("Failed to fetch"));
            })
            .run();
    }

    #[test]
    fn operation_failure_keeps_collection_usable() {
        ReducerTest::new(TicketsReducer::new())
            .with_env(test_env())
            .given_state(TicketsState {
                tickets: vec![sample_ticket(1)],
                status: RequestStatus::Succeeded,
                error: None,
            })
            .when_action(TicketsAction::OperationFailed {
                message: "Failed to add comment. Please try again later.".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.status, RequestStatus::Succeeded);
                assert!(state.error.is_some());
                assert_eq!(state.tickets.len(), 1);
            })
            .run();
    }

    #[test]
    fn empty_title_fails_validation_without_effects() {
        ReducerTest::new(TicketsReducer::new())
            .with_env(test_env())
            .given_state(TicketsState::new())
            .when_action(TicketsAction::SubmitTicket {
                submission: NewTicket {
                    title: "   ".to_string(),
                    description: "desc".to_string(),
                    location: "Homepage".to_string(),
                    priority: TicketPriority::Low,
                    reported_by: UserId::new(1),
                },
            })
            .then_state(|state| {
                assert!(state.error.as_deref().unwrap().contains("cannot be empty"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn empty_comment_fails_validation_without_effects() {
        ReducerTest::new(TicketsReducer::new())
            .with_env(test_env())
            .given_state(TicketsState::new())
            .when_action(TicketsAction::AddComment {
                ticket_id: TicketId::new(1),
                author: UserId::new(1),
                content: String::new(),
            })
            .then_state(|state| {
                assert_eq!(state.error.as_deref(), Some("Comment cannot be empty"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn comment_completions_splice_the_parent() {
        let ticket = sample_ticket(1);
        let comment = Comment {
            id: CommentId::new(1),
            ticket_id: ticket.id,
            author: UserId::new(2),
            content: "First".to_string(),
            created_at: Utc::now(),
        };
        let mut edited = comment.clone();
        edited.content = "First, edited".to_string();

        ReducerTest::new(TicketsReducer::new())
            .with_env(test_env())
            .given_state(TicketsState {
                tickets: vec![ticket],
                status: RequestStatus::Succeeded,
                error: None,
            })
            .when_action(TicketsAction::CommentAdded {
                ticket_id: TicketId::new(1),
                comment,
            })
            .when_action(TicketsAction::CommentEdited {
                ticket_id: TicketId::new(1),
                comment: edited,
            })
            .then_state(|state| {
                let comments = &state.get(TicketId::new(1)).unwrap().comments;
                assert_eq!(comments.len(), 1);
                assert_eq!(comments[0].content, "First, edited");
            })
            .run();
    }

    #[test]
    fn comment_deleted_removes_exactly_one() {
        let mut ticket = sample_ticket(1);
        for (i, text) in ["a", "b"].iter().enumerate() {
            ticket.comments.push(Comment {
                id: CommentId::new(i as u64 + 1),
                ticket_id: ticket.id,
                author: UserId::new(2),
                content: (*text).to_string(),
                created_at: Utc::now(),
            });
        }

        ReducerTest::new(TicketsReducer::new())
            .with_env(test_env())
            .given_state(TicketsState {
                tickets: vec![ticket],
                status: RequestStatus::Succeeded,
                error: None,
            })
            .when_action(TicketsAction::CommentDeleted {
                ticket_id: TicketId::new(1),
                comment_id: CommentId::new(1),
            })
            .then_state(|state| {
                let comments = &state.get(TicketId::new(1)).unwrap().comments;
                assert_eq!(comments.len(), 1);
                assert!(!comments.iter().any(|c| c.id == CommentId::new(1)));
            })
            .run();
    }

    #[test]
    fn rating_submitted_sets_rating() {
        ReducerTest::new(TicketsReducer::new())
            .with_env(test_env())
            .given_state(TicketsState {
                tickets: vec![sample_ticket(1)],
                status: RequestStatus::Succeeded,
                error: None,
            })
            .when_action(TicketsAction::RatingSubmitted {
                ticket_id: TicketId::new(1),
                rating: Rating::try_new(5).unwrap(),
            })
            .then_state(|state| {
                let rating = state.get(TicketId::new(1)).unwrap().rating;
                assert_eq!(rating.map(Rating::value), Some(5));
            })
            .run();
    }
}
