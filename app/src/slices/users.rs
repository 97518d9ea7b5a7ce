//! The users slice: the user directory, the signed-in user, and the
//! reducer backing user management.

use std::sync::Arc;

use accesstrack_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

use super::RequestStatus;
use crate::backend::TicketApi;
use crate::types::{User, UserId, UserRole};

/// Environment dependencies for the users reducer
#[derive(Clone)]
pub struct UsersEnvironment {
    /// Backend handle shared with the other slices
    pub api: Arc<dyn TicketApi>,
}

impl UsersEnvironment {
    /// Creates a new `UsersEnvironment`
    #[must_use]
    pub fn new(api: Arc<dyn TicketApi>) -> Self {
        Self { api }
    }
}

/// State of the users slice
#[derive(Clone, Debug, Default)]
pub struct UsersState {
    /// The mirrored user directory
    pub users: Vec<User>,
    /// The signed-in user, set by the last single-user fetch
    pub current_user: Option<User>,
    /// Lifecycle of the directory fetch
    pub status: RequestStatus,
    /// Last failure, as a display string
    pub error: Option<String>,
}

impl UsersState {
    /// Creates an empty slice state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a user by id
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

/// Actions processed by the users reducer
#[derive(Clone, Debug)]
pub enum UsersAction {
    // ========== Commands ==========
    /// Command: load the full user directory
    FetchUsers,
    /// Command: load one user and make them the current user
    FetchUser {
        /// User to load
        id: UserId,
    },
    /// Command: create a user (admin user management)
    AddUser {
        /// Display name
        name: String,
        /// Email address
        email: String,
        /// Account role
        role: UserRole,
    },
    /// Command: clear the current user
    SignOut,

    // ========== Completions ==========
    /// The directory arrived
    UsersLoaded {
        /// Fresh directory replacing the mirror
        users: Vec<User>,
    },
    /// A single user arrived; upserted and made current
    UserLoaded {
        /// The fetched user
        user: User,
    },
    /// A user was created
    UserAdded {
        /// The created user
        user: User,
    },

    // ========== Failures ==========
    /// The directory fetch failed; drives the lifecycle to `Failed`
    LoadFailed {
        /// Display string for the toast
        message: String,
    },
    /// A targeted operation failed; the directory stays usable
    OperationFailed {
        /// Display string for the toast
        message: String,
    },
}

/// Reducer for the users slice
#[derive(Clone, Copy, Debug, Default)]
pub struct UsersReducer;

impl UsersReducer {
    /// Creates a new `UsersReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_new_user(name: &str, email: &str) -> Result<(), String> {
        if name.trim().is_empty() {
            return Err("User name cannot be empty".to_string());
        }
        if email.trim().is_empty() || !email.contains('@') {
            return Err("User email is not valid".to_string());
        }
        Ok(())
    }

    fn upsert(users: &mut Vec<User>, user: User) {
        if let Some(slot) = users.iter_mut().find(|u| u.id == user.id) {
            *slot = user;
        } else {
            users.push(user);
        }
    }
}

impl Reducer for UsersReducer {
    type State = UsersState;
    type Action = UsersAction;
    type Environment = UsersEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            UsersAction::FetchUsers => {
                state.status = RequestStatus::Loading;
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.list_users().await {
                        Ok(users) => Some(UsersAction::UsersLoaded { users }),
                        Err(error) => {
                            tracing::error!(%error, "Fetching users failed");
                            Some(UsersAction::LoadFailed {
                                message: "Failed to fetch users".to_string(),
                            })
                        },
                    }
                })]
            },

            UsersAction::FetchUser { id } => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.get_user(id).await {
                        Ok(Some(user)) => Some(UsersAction::UserLoaded { user }),
                        // An unknown id is not an error for this fetch; state
                        // is simply left as it was
                        Ok(None) => None,
                        Err(error) => {
                            tracing::error!(%error, user_id = %id, "Fetching user failed");
                            Some(UsersAction::OperationFailed {
                                message: "Failed to fetch user. Please try again later."
                                    .to_string(),
                            })
                        },
                    }
                })]
            },

            UsersAction::AddUser { name, email, role } => {
                if let Err(message) = Self::validate_new_user(&name, &email) {
                    state.error = Some(message);
                    return smallvec![];
                }
                state.error = None;
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.create_user(name, email, role).await {
                        Ok(user) => Some(UsersAction::UserAdded { user }),
                        Err(error) => {
                            tracing::error!(%error, "Adding user failed");
                            Some(UsersAction::OperationFailed {
                                message: "Failed to add user. Please try again later."
                                    .to_string(),
                            })
                        },
                    }
                })]
            },

            UsersAction::SignOut => {
                state.current_user = None;
                smallvec![]
            },

            // ========== Completions ==========
            UsersAction::UsersLoaded { users } => {
                state.status = RequestStatus::Succeeded;
                state.users = users;
                smallvec![]
            },

            UsersAction::UserLoaded { user } => {
                Self::upsert(&mut state.users, user.clone());
                state.current_user = Some(user);
                smallvec![]
            },

            UsersAction::UserAdded { user } => {
                state.users.push(user);
                state.error = None;
                smallvec![]
            },

            // ========== Failures ==========
            UsersAction::LoadFailed { message } => {
                state.status = RequestStatus::Failed;
                state.error = Some(message);
                smallvec![]
            },

            UsersAction::OperationFailed { message } => {
                state.error = Some(message);
                smallvec![]
            },
        }
    }
}
