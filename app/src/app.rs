//! Application wiring: one store per slice over a shared backend.

use std::sync::Arc;

use accesstrack_assist::AssistClient;
use accesstrack_core::environment::{Clock, SystemClock};
use accesstrack_runtime::Store;

use crate::backend::{InMemoryBackend, TicketApi};
use crate::config::Config;
use crate::slices::notifications::{
    NotificationsAction, NotificationsEnvironment, NotificationsReducer, NotificationsState,
};
use crate::slices::tickets::{TicketsAction, TicketsEnvironment, TicketsReducer, TicketsState};
use crate::slices::users::{UsersAction, UsersEnvironment, UsersReducer, UsersState};

/// Store driving the tickets slice
pub type TicketsStore = Store<TicketsState, TicketsAction, TicketsEnvironment, TicketsReducer>;

/// Store driving the users slice
pub type UsersStore = Store<UsersState, UsersAction, UsersEnvironment, UsersReducer>;

/// Store driving the notifications slice
pub type NotificationsStore =
    Store<NotificationsState, NotificationsAction, NotificationsEnvironment, NotificationsReducer>;

/// The assembled application: three slice stores sharing one backend
///
/// Constructed once per process (or per test). The presentation layer
/// dispatches actions into the stores and reads state back out; the derived
/// views in [`crate::views`] operate on the read-out collections.
pub struct App {
    /// Tickets slice store
    pub tickets: TicketsStore,
    /// Users slice store
    pub users: UsersStore,
    /// Notifications slice store
    pub notifications: NotificationsStore,
    /// Best-effort AI assist, when configured
    pub assist: Option<AssistClient>,
}

impl App {
    /// Assemble the stores over the given backend and clock
    #[must_use]
    pub fn new(api: Arc<dyn TicketApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets: Store::new(
                TicketsState::new(),
                TicketsReducer::new(),
                TicketsEnvironment::new(Arc::clone(&api)),
            ),
            users: Store::new(
                UsersState::new(),
                UsersReducer::new(),
                UsersEnvironment::new(api),
            ),
            notifications: Store::new(
                NotificationsState::new(),
                NotificationsReducer::new(),
                NotificationsEnvironment::new(clock),
            ),
            assist: None,
        }
    }

    /// Assemble the application from configuration
    ///
    /// Builds the seeded in-memory backend with the configured latency, the
    /// system clock, and the assist client when an API key is configured.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let api: Arc<dyn TicketApi> =
            Arc::new(InMemoryBackend::new(config.latency(), Arc::clone(&clock)));

        let assist = config.assist.api_key.clone().map(|key| {
            let client = AssistClient::new(key);
            match &config.assist.api_url {
                Some(url) => client.with_api_url(url.clone()),
                None => client,
            }
        });

        let mut app = Self::new(api, clock);
        app.assist = assist;
        app
    }
}
