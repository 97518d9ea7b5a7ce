//! # Accesstrack Runtime
//!
//! Runtime implementation for the accesstrack architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back
//!   to reducers
//! - **`EffectHandle`**: Completion tracking for the effects of one action
//!
//! ## Example
//!
//! ```ignore
//! use accesstrack_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action and wait for its effects
//! let mut handle = store.send(Action::FetchTickets).await?;
//! handle.wait().await;
//!
//! // Read state
//! let count = store.state(|s| s.tickets.len()).await;
//! ```

use accesstrack_core::{effect::Effect, reducer::Reducer};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a terminal action
        ///
        /// Returned by `send_and_wait_for` and `wait_with_timeout` when the
        /// timeout expires first.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// Typically means the store is shutting down.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send`] so callers can wait for the effects of a
/// single action to finish. An effect counts as finished once its async work
/// is done AND any action it produced has been reduced back into state.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::FetchTickets).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // The fetch completed and its result is in state
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Useful for initialization in loops where a `last_handle` is threaded
    /// through iterations.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all effects spawned by the originating `send` to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            let _ = self.completion.changed().await;
        }
    }

    /// Wait for all effects to complete, bounded by a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }

    /// Number of effects still in flight
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context shared by the tasks of one `send`
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Ensures the counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
///
/// The reducer runs synchronously under the write lock, so concurrent `send`
/// calls serialize at the reducer and no parallel mutation of state is
/// possible. Effects run on spawned tasks and may complete in any order;
/// their follow-up actions are applied in completion order
/// (last-resolved-wins).
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    /// Broadcast channel for observing actions produced by effects.
    ///
    /// Actions produced by `Effect::Future` and `Effect::Delay` are broadcast
    /// to observers before being fed back into the reducer. This enables
    /// request-response waiting and notification toasts.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// The action broadcast capacity defaults to 16; use
    /// [`Store::with_broadcast_capacity`] for many or slow observers.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new store with a custom action broadcast capacity
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            action_broadcast,
        }
    }

    /// Send an action to the store
    ///
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Starts execution of the returned effects
    /// 4. Effects may produce more actions (feedback loop)
    ///
    /// `send` returns after *starting* effect execution; use the returned
    /// [`EffectHandle`] to wait for completion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            return Err(StoreError::ShutdownInProgress);
        }

        let (handle, tracking) = EffectHandle::new();

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };

        tracing::trace!("Reducer returned {} effects", effects.len());
        for effect in effects {
            self.execute_effect(effect, &tracking);
        }

        Ok(handle)
    }

    /// Send an action and wait for a matching result action
    ///
    /// Designed for request-response flows: subscribes to the action
    /// broadcast *before* sending (avoiding a race), sends the action, then
    /// returns the first effect-produced action matching the predicate.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action within `timeout`
    /// - [`StoreError::ChannelClosed`]: broadcast channel closed
    /// - [`StoreError::ShutdownInProgress`]: store is shutting down
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        let mut rx = self.action_broadcast.subscribe();

        self.send(action).await?;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Slow consumer; the timeout catches a dropped match
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to all actions produced by effects of this store
    ///
    /// Actions sent directly via [`Store::send`] are not broadcast, only
    /// actions that come out of effect execution.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure so the read lock is released promptly:
    ///
    /// ```ignore
    /// let open = store.state(|s| s.tickets.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Sets the shutdown flag (rejecting new actions), then waits for
    /// in-flight effects to drain.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires with
    /// effects still running.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        self.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(25);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending_effects = pending, "Shutdown timed out");
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Start execution of a single effect
    ///
    /// `Parallel` fans out into sibling effects sharing the same tracking;
    /// everything that involves real async work is moved onto a spawned task
    /// guarded so the counters survive panics.
    fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
        match effect {
            Effect::None => {},
            Effect::Parallel(effects) => {
                for effect in effects {
                    self.execute_effect(effect, tracking);
                }
            },
            effect @ (Effect::Future(_) | Effect::Delay { .. } | Effect::Sequential(_)) => {
                tracking.increment();
                self.pending_effects.fetch_add(1, Ordering::SeqCst);

                let guard = DecrementGuard(tracking.clone());
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = guard;
                    let _pending_guard = pending_guard;
                    run_effect_to_completion(store, effect).await;
                });
            },
        }
    }

    /// Feed an effect-produced action back through the store
    ///
    /// The action is broadcast to observers first, then reduced. A send
    /// rejected by shutdown is dropped deliberately.
    async fn feed_back(&self, action: A) {
        let _ = self.action_broadcast.send(action.clone());
        let _ = self.send(action).await;
    }
}

/// Drive one effect to completion, including the feedback of any actions
///
/// Boxed so `Sequential` and `Parallel` can recurse.
fn run_effect_to_completion<S, A, E, R>(
    store: Store<S, A, E, R>,
    effect: Effect<A>,
) -> Pin<Box<dyn Future<Output = ()> + Send>>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => {},
            Effect::Future(fut) => {
                if let Some(action) = fut.await {
                    tracing::trace!("Effect::Future produced an action");
                    store.feed_back(action).await;
                } else {
                    tracing::trace!("Effect::Future completed with no action");
                }
            },
            Effect::Delay { duration, action } => {
                tokio::time::sleep(duration).await;
                store.feed_back(*action).await;
            },
            Effect::Parallel(effects) => {
                let mut tasks = Vec::with_capacity(effects.len());
                for effect in effects {
                    tasks.push(tokio::spawn(run_effect_to_completion(
                        store.clone(),
                        effect,
                    )));
                }
                for task in tasks {
                    let _ = task.await;
                }
            },
            Effect::Sequential(effects) => {
                for effect in effects {
                    run_effect_to_completion(store.clone(), effect).await;
                }
            },
        }
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use accesstrack_core::{SmallVec, smallvec};

    #[derive(Clone, Debug, Default)]
    struct TestState {
        value: i64,
        echoes: Vec<String>,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        AddLater(i64),
        Added(i64),
        EchoBoth(String, String),
        EchoInOrder(String, String),
        Echoed(String),
    }

    #[derive(Clone)]
    struct TestEnv;

    #[derive(Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut TestState,
            action: TestAction,
            _env: &TestEnv,
        ) -> SmallVec<[Effect<TestAction>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::AddLater(n) => {
                    smallvec![Effect::future(async move { Some(TestAction::Added(n)) })]
                },
                TestAction::Added(n) => {
                    state.value += n;
                    smallvec![Effect::None]
                },
                TestAction::EchoBoth(a, b) => {
                    smallvec![Effect::merge(vec![
                        Effect::future(async move { Some(TestAction::Echoed(a)) }),
                        Effect::future(async move { Some(TestAction::Echoed(b)) }),
                    ])]
                },
                TestAction::EchoInOrder(a, b) => {
                    smallvec![Effect::chain(vec![
                        Effect::future(async move { Some(TestAction::Echoed(a)) }),
                        Effect::future(async move { Some(TestAction::Echoed(b)) }),
                    ])]
                },
                TestAction::Echoed(s) => {
                    state.echoes.push(s);
                    smallvec![Effect::None]
                },
            }
        }
    }

    fn test_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState::default(), TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn send_runs_reducer_synchronously() {
        let store = test_store();
        store.send(TestAction::Increment).await.unwrap();
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn future_effect_feeds_action_back() {
        let store = test_store();
        let mut handle = store.send(TestAction::AddLater(41)).await.unwrap();
        handle.wait().await;
        assert_eq!(store.state(|s| s.value).await, 41);
    }

    #[tokio::test]
    async fn parallel_effects_all_complete() {
        let store = test_store();
        let mut handle = store
            .send(TestAction::EchoBoth("a".into(), "b".into()))
            .await
            .unwrap();
        handle.wait().await;
        let mut echoes = store.state(|s| s.echoes.clone()).await;
        echoes.sort();
        assert_eq!(echoes, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn sequential_effects_complete_in_order() {
        let store = test_store();
        let mut handle = store
            .send(TestAction::EchoInOrder("first".into(), "second".into()))
            .await
            .unwrap();
        handle.wait().await;
        let echoes = store.state(|s| s.echoes.clone()).await;
        assert_eq!(echoes, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn send_and_wait_for_returns_matching_action() {
        let store = test_store();
        let result = store
            .send_and_wait_for(
                TestAction::AddLater(7),
                |a| matches!(a, TestAction::Added(_)),
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert!(matches!(result, TestAction::Added(7)));
    }

    #[tokio::test]
    async fn subscribe_actions_observes_effect_output() {
        let store = test_store();
        let mut rx = store.subscribe_actions();
        let mut handle = store.send(TestAction::AddLater(3)).await.unwrap();
        handle.wait().await;
        let observed = rx.recv().await.unwrap();
        assert!(matches!(observed, TestAction::Added(3)));
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = test_store();
        store.shutdown(Duration::from_secs(1)).await.unwrap();
        let result = store.send(TestAction::Increment).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    }

    #[tokio::test]
    async fn completed_handle_waits_immediately() {
        let mut handle = EffectHandle::completed();
        handle
            .wait_with_timeout(Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(handle.pending(), 0);
    }
}
