//! The notifications slice: transient toasts raised by the presentation
//! layer.
//!
//! Notifications are purely client-side. The fetch action exists so the
//! slice runs the same request lifecycle as the others; its payload is
//! always empty until a real notification service is wired in.

use std::sync::Arc;

use accesstrack_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};

use super::RequestStatus;
use crate::types::{Notification, NotificationId, Severity};

/// Environment dependencies for the notifications reducer
#[derive(Clone)]
pub struct NotificationsEnvironment {
    /// Clock stamping new notifications
    pub clock: Arc<dyn Clock>,
}

impl NotificationsEnvironment {
    /// Creates a new `NotificationsEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

/// State of the notifications slice
#[derive(Clone, Debug)]
pub struct NotificationsState {
    /// Notifications, newest first
    pub notifications: Vec<Notification>,
    /// Next identifier handed out by this slice
    next_id: u64,
    /// Lifecycle of the notification fetch
    pub status: RequestStatus,
    /// Last failure, as a display string
    pub error: Option<String>,
}

impl NotificationsState {
    /// Creates an empty slice state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            notifications: Vec::new(),
            next_id: 1,
            status: RequestStatus::Idle,
            error: None,
        }
    }

    /// Number of unread notifications
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}

impl Default for NotificationsState {
    fn default() -> Self {
        Self::new()
    }
}

/// Actions processed by the notifications reducer
#[derive(Clone, Debug)]
pub enum NotificationsAction {
    /// Command: load notifications (placeholder, resolves empty)
    Fetch,
    /// Command: raise a toast
    Add {
        /// Message shown to the user
        message: String,
        /// Severity class
        severity: Severity,
    },
    /// Command: mark one notification as read
    MarkRead {
        /// The notification to mark
        id: NotificationId,
    },
    /// Completion: the (empty) notification list arrived
    Loaded {
        /// Fetched notifications
        notifications: Vec<Notification>,
    },
}

/// Reducer for the notifications slice
#[derive(Clone, Copy, Debug, Default)]
pub struct NotificationsReducer;

impl NotificationsReducer {
    /// Creates a new `NotificationsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for NotificationsReducer {
    type State = NotificationsState;
    type Action = NotificationsAction;
    type Environment = NotificationsEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            NotificationsAction::Fetch => {
                state.status = RequestStatus::Loading;
                smallvec![Effect::future(async {
                    Some(NotificationsAction::Loaded {
                        notifications: Vec::new(),
                    })
                })]
            },

            NotificationsAction::Loaded { notifications } => {
                state.status = RequestStatus::Succeeded;
                state.notifications = notifications;
                smallvec![]
            },

            NotificationsAction::Add { message, severity } => {
                let notification = Notification::new(
                    NotificationId::new(state.next_id),
                    message,
                    severity,
                    env.clock.now(),
                );
                state.next_id += 1;
                // Newest first
                state.notifications.insert(0, notification);
                smallvec![]
            },

            NotificationsAction::MarkRead { id } => {
                if let Some(notification) =
                    state.notifications.iter_mut().find(|n| n.id == id)
                {
                    notification.read = true;
                }
                smallvec![]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use accesstrack_testing::{ReducerTest, assertions, test_clock};

    fn test_env() -> NotificationsEnvironment {
        NotificationsEnvironment::new(Arc::new(test_clock()))
    }

    #[test]
    fn fetch_runs_the_lifecycle() {
        ReducerTest::new(NotificationsReducer::new())
            .with_env(test_env())
            .given_state(NotificationsState::new())
            .when_action(NotificationsAction::Fetch)
            .then_state(|state| assert_eq!(state.status, RequestStatus::Loading))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn add_prepends_unread_with_monotonic_ids() {
        ReducerTest::new(NotificationsReducer::new())
            .with_env(test_env())
            .given_state(NotificationsState::new())
            .when_action(NotificationsAction::Add {
                message: "Ticket submitted".to_string(),
                severity: Severity::Success,
            })
            .when_action(NotificationsAction::Add {
                message: "Assignment failed".to_string(),
                severity: Severity::Error,
            })
            .then_state(|state| {
                assert_eq!(state.notifications.len(), 2);
                // Newest first
                assert_eq!(state.notifications[0].message, "Assignment failed");
                assert_eq!(state.notifications[0].id, NotificationId::new(2));
                assert_eq!(state.notifications[1].id, NotificationId::new(1));
                assert_eq!(state.unread_count(), 2);
            })
            .run();
    }

    #[test]
    fn mark_read_flips_the_flag() {
        ReducerTest::new(NotificationsReducer::new())
            .with_env(test_env())
            .given_state(NotificationsState::new())
            .when_action(NotificationsAction::Add {
                message: "Ticket submitted".to_string(),
                severity: Severity::Info,
            })
            .when_action(NotificationsAction::MarkRead {
                id: NotificationId::new(1),
            })
            .then_state(|state| {
                assert!(state.notifications[0].read);
                assert_eq!(state.unread_count(), 0);
            })
            .run();
    }
}
