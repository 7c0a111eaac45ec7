//! Daily rollover scheduler
//!
//! Polls the clock on a fixed interval and, when the calendar day has moved
//! on, clears the quote cache and fetches a fresh quote of the day. The poll
//! runs as a background tokio task controlled through a `SchedulerHandle`.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::clock::{date_string, minutes_since_midnight, Clock};
use crate::quote::{QuoteResponse, QuoteService, QuoteSource, Role};
use crate::storage::KeyValueStore;

/// Default time between rollover checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// What the scheduler is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    /// Comparing dates; only held under the internal lock, so callers
    /// observe `Idle` or `Fetching` instead
    Checking,
    /// A refresh triggered by a check is in flight
    Fetching,
}

#[derive(Debug)]
struct Inner {
    role: Role,
    /// Date of the last triggered update; `None` until the first one since startup
    last_update: Option<String>,
    state: SchedulerState,
}

/// Detects day rollover and refreshes the quote of the day
pub struct DailyScheduler<S, Q, C> {
    service: Arc<QuoteService<S, Q, C>>,
    inner: Mutex<Inner>,
}

impl<S, Q, C> DailyScheduler<S, Q, C>
where
    S: KeyValueStore,
    Q: QuoteSource,
    C: Clock,
{
    /// Creates a scheduler refreshing quotes for `role`
    pub fn new(service: Arc<QuoteService<S, Q, C>>, role: Role) -> Self {
        Self {
            service,
            inner: Mutex::new(Inner {
                role,
                last_update: None,
                state: SchedulerState::Idle,
            }),
        }
    }

    pub fn service(&self) -> &Arc<QuoteService<S, Q, C>> {
        &self.service
    }

    /// Role used for the next refresh
    pub fn role(&self) -> Role {
        self.lock().role
    }

    /// Changes the role used for subsequent refreshes
    pub fn set_role(&self, role: Role) {
        self.lock().role = role;
    }

    /// Date (`YYYY-MM-DD`) of the last triggered update
    pub fn last_update_date(&self) -> Option<String> {
        self.lock().last_update.clone()
    }

    pub fn state(&self) -> SchedulerState {
        self.lock().state
    }

    /// Runs the startup check
    pub async fn initialize(&self) -> bool {
        self.check_for_update().await
    }

    /// Checks for a day change and refreshes the quote if needed
    ///
    /// An update fires when the date differs from the last update and either
    /// the clock reads exactly midnight or no update has happened since
    /// startup. The last-update date advances whether or not the fetch
    /// succeeds, so a failed fetch waits for the next day or a forced update.
    ///
    /// # Returns
    /// * `true` if a refresh was triggered
    pub async fn check_for_update(&self) -> bool {
        let now = self.service.clock().now();
        let today = date_string(now.date());

        let role = {
            let mut inner = self.lock();
            inner.state = SchedulerState::Checking;

            let day_changed = inner.last_update.as_deref() != Some(today.as_str());
            let at_midnight = minutes_since_midnight(now) == 0;
            let first_update = inner.last_update.is_none();

            if !(day_changed && (at_midnight || first_update)) {
                inner.state = SchedulerState::Idle;
                return false;
            }

            inner.state = SchedulerState::Fetching;
            inner.role
        };

        tracing::info!(%role, date = %today, "Day changed, refreshing quote of the day");
        let response = self.service.refresh_quote(role).await;

        let mut inner = self.lock();
        inner.last_update = Some(today);
        inner.state = SchedulerState::Idle;
        tracing::debug!(success = response.success, "Scheduled refresh settled");
        true
    }

    /// Clears the cache and refetches regardless of the date
    pub async fn force_update(&self) -> QuoteResponse {
        let role = self.role();
        tracing::info!(%role, "Forcing quote refresh");
        self.service.refresh_quote(role).await
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S, Q, C> DailyScheduler<S, Q, C>
where
    S: KeyValueStore + 'static,
    Q: QuoteSource + 'static,
    C: Clock + 'static,
{
    /// Spawns the polling task
    ///
    /// The task runs the startup check immediately, then checks again every
    /// `interval` until the returned handle is shut down or dropped.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick is immediate and covers the startup check
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.check_for_update().await;
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
            tracing::debug!("Scheduler stopped");
        });

        SchedulerHandle { shutdown_tx, task }
    }
}

/// Handle for stopping a spawned scheduler
pub struct SchedulerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stops the polling task and waits for it to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
    }
}
