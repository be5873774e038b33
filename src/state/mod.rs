//! Shared application state: live quiz sessions and the storage handle.

pub mod session;

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::{config::AppConfig, dao::result_store::ResultStore, error::ServiceError};

use self::session::QuizSession;

/// Cheaply clonable handle to the central application state.
pub type SharedState = Arc<AppState>;

/// One hosted quiz session together with its countdown task.
///
/// Every mutation of the wrapped session, whether it comes from a request
/// handler or from the countdown task, goes through the same async mutex,
/// so timer ticks and user-driven operations never interleave.
pub struct SessionHandle {
    session: Mutex<QuizSession>,
    timer: StdMutex<Option<JoinHandle<()>>>,
    last_active: StdMutex<Instant>,
}

impl SessionHandle {
    /// Wrap a session, with no countdown attached yet.
    pub fn new(session: QuizSession) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(session),
            timer: StdMutex::new(None),
            last_active: StdMutex::new(Instant::now()),
        })
    }

    /// Record client activity for idle-eviction bookkeeping.
    pub fn touch(&self) {
        let mut slot = self
            .last_active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Instant::now();
    }

    /// Time elapsed since the last recorded client activity.
    pub fn idle_for(&self) -> Duration {
        let slot = self
            .last_active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.elapsed()
    }

    /// The session behind its mutex.
    pub fn session(&self) -> &Mutex<QuizSession> {
        &self.session
    }

    /// Attach the countdown task, aborting any previously attached one.
    pub fn install_timer(&self, handle: JoinHandle<()>) {
        let mut slot = self
            .timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Abort the countdown task, if one is attached.
    ///
    /// Called on every transition out of the in-progress phase so a stray
    /// tick can never mutate a finished or restarted session.
    pub fn cancel_timer(&self) {
        let mut slot = self
            .timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Central application state storing live sessions and database handles.
pub struct AppState {
    config: AppConfig,
    result_store: RwLock<Option<Arc<dyn ResultStore>>>,
    sessions: DashMap<Uuid, Arc<SessionHandle>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            config,
            result_store: RwLock::new(None),
            sessions: DashMap::new(),
        })
    }

    /// Immutable runtime configuration (the loaded question set).
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Registry of live quiz sessions keyed by their identifier.
    pub fn sessions(&self) -> &DashMap<Uuid, Arc<SessionHandle>> {
        &self.sessions
    }

    /// Obtain a handle to the current result store, if one is installed.
    pub async fn result_store(&self) -> Option<Arc<dyn ResultStore>> {
        let guard = self.result_store.read().await;
        guard.as_ref().cloned()
    }

    /// Result store handle, or a degraded-mode error when none is installed.
    pub async fn require_result_store(&self) -> Result<Arc<dyn ResultStore>, ServiceError> {
        self.result_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new result store implementation and leave degraded mode.
    pub async fn install_result_store(&self, store: Arc<dyn ResultStore>) {
        let mut guard = self.result_store.write().await;
        *guard = Some(store);
    }

    /// Remove the current result store and enter degraded mode.
    pub async fn clear_result_store(&self) {
        let mut guard = self.result_store.write().await;
        guard.take();
    }

    /// Whether the application currently runs without a result store.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.result_store.read().await;
        guard.is_none()
    }
}
