use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::ResultRecordEntity,
    dto::session::{SelectOptionRequest, SessionView, StartSessionRequest},
    error::ServiceError,
    services::result_service,
    state::{
        SessionHandle, SharedState,
        session::{AdvanceOutcome, QuizSession, SessionPhase, TickOutcome},
    },
};

/// Sessions idle longer than this are dropped by the background sweep.
const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
/// Cadence of the idle sweep.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start a fresh session for the named participant and begin its countdown.
pub async fn start_session(
    state: &SharedState,
    request: StartSessionRequest,
) -> Result<SessionView, ServiceError> {
    let id = Uuid::new_v4();
    let handle = new_started_handle(state, &request.name)?;

    let view = {
        let session = handle.session().lock().await;
        SessionView::from_session(id, &session)
    };

    state.sessions().insert(id, handle);
    info!(%id, participant = %request.name.trim(), "quiz session started");
    Ok(view)
}

/// Current projection of a hosted session.
pub async fn get_session(state: &SharedState, id: Uuid) -> Result<SessionView, ServiceError> {
    let handle = lookup(state, id)?;
    let session = handle.session().lock().await;
    Ok(SessionView::from_session(id, &session))
}

/// Record an answer for the session's current question.
pub async fn select_option(
    state: &SharedState,
    id: Uuid,
    request: SelectOptionRequest,
) -> Result<SessionView, ServiceError> {
    let handle = lookup(state, id)?;
    let mut session = handle.session().lock().await;
    session.select_option(&request.option)?;
    Ok(SessionView::from_session(id, &session))
}

/// Advance the session past its current question.
pub async fn advance_session(state: &SharedState, id: Uuid) -> Result<SessionView, ServiceError> {
    let handle = lookup(state, id)?;

    let (view, outcome) = {
        let mut session = handle.session().lock().await;
        let outcome = session.advance()?;
        if let AdvanceOutcome::NextQuestion { .. } = outcome {
            // The next question's countdown starts from a fresh interval,
            // not partway through the old one.
            handle.install_timer(spawn_countdown(&handle));
        }
        (SessionView::from_session(id, &session), outcome)
    };

    if outcome == AdvanceOutcome::Finished {
        handle.cancel_timer();
        info!(%id, "quiz session finished");
    }

    Ok(view)
}

/// Return to the previous question.
pub async fn go_back(state: &SharedState, id: Uuid) -> Result<SessionView, ServiceError> {
    let handle = lookup(state, id)?;
    let mut session = handle.session().lock().await;
    session.go_back()?;
    // Same fresh-interval rule as a user-driven advance.
    handle.install_timer(spawn_countdown(&handle));
    Ok(SessionView::from_session(id, &session))
}

/// Discard the session and replace it with a freshly started one.
///
/// The previous countdown is cancelled before the swap so a stray tick can
/// never touch the new session.
pub async fn restart_session(
    state: &SharedState,
    id: Uuid,
    request: StartSessionRequest,
) -> Result<SessionView, ServiceError> {
    let previous = lookup(state, id)?;
    let handle = new_started_handle(state, &request.name)?;

    let view = {
        let session = handle.session().lock().await;
        SessionView::from_session(id, &session)
    };

    previous.cancel_timer();
    state.sessions().insert(id, handle);
    info!(%id, "quiz session restarted");
    Ok(view)
}

/// Persist a finished session's tally through the shared result service.
///
/// The summary is copied out of the session before the network call, so a
/// storage or connectivity failure cannot mutate the finished session: the
/// caller may simply retry the submission. A successful submission is
/// terminal and releases the session from the registry.
pub async fn submit_session(
    state: &SharedState,
    id: Uuid,
) -> Result<ResultRecordEntity, ServiceError> {
    let handle = lookup(state, id)?;

    let summary = {
        let session = handle.session().lock().await;
        session.finished_summary()?
    };

    let record = result_service::submit_result(
        state,
        Some(summary.participant_name),
        Some(summary.score as i32),
        Some(summary.question_count as i32),
    )
    .await?;

    state.sessions().remove(&id);
    info!(%id, "quiz session submitted and released");
    Ok(record)
}

/// Periodically drop sessions that have seen no client activity.
pub async fn run_idle_sweeper(state: SharedState) {
    let mut ticker = interval(SWEEP_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        evict_idle_sessions(&state);
    }
}

fn evict_idle_sessions(state: &SharedState) {
    let before = state.sessions().len();
    state
        .sessions()
        .retain(|_, handle| handle.idle_for() < SESSION_IDLE_TIMEOUT);

    let evicted = before - state.sessions().len();
    if evicted > 0 {
        info!(evicted, "evicted idle quiz sessions");
    }
}

fn lookup(state: &SharedState, id: Uuid) -> Result<Arc<SessionHandle>, ServiceError> {
    state
        .sessions()
        .get(&id)
        .map(|entry| {
            let handle = Arc::clone(entry.value());
            handle.touch();
            handle
        })
        .ok_or_else(|| ServiceError::NotFound(format!("session `{id}` not found")))
}

fn new_started_handle(
    state: &SharedState,
    name: &str,
) -> Result<Arc<SessionHandle>, ServiceError> {
    let mut session = QuizSession::new(state.config().questions());
    session.start(name)?;

    let handle = SessionHandle::new(session);
    handle.install_timer(spawn_countdown(&handle));
    Ok(handle)
}

/// Drive the per-question countdown for one session.
///
/// The task holds only a weak reference so dropping the handle (restart,
/// registry removal) stops the timer; it also exits on its own as soon as
/// the session leaves the in-progress phase.
fn spawn_countdown(handle: &Arc<SessionHandle>) -> JoinHandle<()> {
    let weak = Arc::downgrade(handle);
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval fires immediately; consume it so
        // the countdown starts a full second after the question is shown.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(handle) = weak.upgrade() else {
                break;
            };

            let mut session = handle.session().lock().await;
            if session.phase() != SessionPhase::InProgress {
                break;
            }

            match session.tick() {
                Ok(TickOutcome::ForcedAdvance(AdvanceOutcome::Finished)) => break,
                Ok(_) => {}
                Err(_) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::future::BoxFuture;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{models::NewResultRecord, result_store::ResultStore, storage::StorageResult},
        state::AppState,
    };

    #[derive(Default)]
    struct RecordingStore {
        records: Mutex<Vec<ResultRecordEntity>>,
    }

    impl ResultStore for RecordingStore {
        fn insert_result(
            &self,
            record: NewResultRecord,
        ) -> BoxFuture<'static, StorageResult<ResultRecordEntity>> {
            let entity = {
                let mut guard = self.records.lock().unwrap();
                let entity = ResultRecordEntity {
                    id: format!("record-{}", guard.len()),
                    username: record.username,
                    score: record.score,
                    total_questions: record.total_questions,
                };
                guard.push(entity.clone());
                entity
            };
            Box::pin(async move { Ok(entity) })
        }

        fn list_results(&self) -> BoxFuture<'static, StorageResult<Vec<ResultRecordEntity>>> {
            let records = self.records.lock().unwrap().clone();
            Box::pin(async move { Ok(records) })
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn test_state() -> SharedState {
        AppState::new(AppConfig::default())
    }

    fn start_request(name: &str) -> StartSessionRequest {
        StartSessionRequest {
            name: name.to_owned(),
        }
    }

    #[tokio::test]
    async fn start_rejects_empty_name() {
        let state = test_state();
        let err = start_session(&state, start_request("  ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(state.sessions().is_empty());
    }

    #[tokio::test]
    async fn full_flow_through_service_layer() {
        let state = test_state();
        let view = start_session(&state, start_request("Alice")).await.unwrap();
        let id = view.id;
        assert_eq!(view.question_count, 10);
        assert_eq!(view.question_index, 0);

        let question = view.question.expect("in-progress view carries a question");
        let first_option = question.options[0].clone();

        let view = select_option(
            &state,
            id,
            SelectOptionRequest {
                option: first_option.clone(),
            },
        )
        .await
        .unwrap();
        assert_eq!(view.question.unwrap().selected, Some(first_option));

        let view = advance_session(&state, id).await.unwrap();
        assert_eq!(view.question_index, 1);

        let view = go_back(&state, id).await.unwrap();
        assert_eq!(view.question_index, 0);
        assert_eq!(view.remaining_seconds, Some(10));
    }

    #[tokio::test]
    async fn select_rejects_option_not_in_question() {
        let state = test_state();
        let view = start_session(&state, start_request("Alice")).await.unwrap();

        let err = select_option(
            &state,
            view.id,
            SelectOptionRequest {
                option: "definitely not an option".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn submit_requires_a_finished_session() {
        let state = test_state();
        let view = start_session(&state, start_request("Alice")).await.unwrap();

        let err = submit_session(&state, view.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let state = test_state();
        let err = get_session(&state, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn restart_replaces_with_a_fresh_session() {
        let state = test_state();
        let view = start_session(&state, start_request("Alice")).await.unwrap();
        let id = view.id;

        // Finish the whole quiz without answering.
        for _ in 0..10 {
            advance_session(&state, id).await.unwrap();
        }
        let finished = get_session(&state, id).await.unwrap();
        assert_eq!(finished.score, Some(0));

        let fresh = restart_session(&state, id, start_request("Alice")).await.unwrap();
        assert_eq!(fresh.id, id);
        assert_eq!(fresh.question_index, 0);
        assert_eq!(fresh.score, None);
        assert!(fresh.question.unwrap().selected.is_none());
    }

    #[tokio::test]
    async fn successful_submit_releases_the_session() {
        let state = test_state();
        state
            .install_result_store(Arc::new(RecordingStore::default()))
            .await;

        let view = start_session(&state, start_request("Alice")).await.unwrap();
        let id = view.id;
        for _ in 0..10 {
            advance_session(&state, id).await.unwrap();
        }

        let record = submit_session(&state, id).await.unwrap();
        assert_eq!(record.username, "Alice");
        assert!(state.sessions().is_empty());

        let err = get_session(&state, id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn failed_submit_keeps_the_session_for_retry() {
        let state = test_state();

        let view = start_session(&state, start_request("Alice")).await.unwrap();
        let id = view.id;
        for _ in 0..10 {
            advance_session(&state, id).await.unwrap();
        }

        // No store installed, so the submission fails.
        let err = submit_session(&state, id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));

        let finished = get_session(&state, id).await.unwrap();
        assert_eq!(finished.score, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_evicted_by_the_sweep() {
        let state = test_state();
        start_session(&state, start_request("Alice")).await.unwrap();

        tokio::time::sleep(SESSION_IDLE_TIMEOUT + Duration::from_secs(1)).await;
        evict_idle_sessions(&state);
        assert!(state.sessions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn recently_touched_sessions_survive_the_sweep() {
        let state = test_state();
        let view = start_session(&state, start_request("Alice")).await.unwrap();

        tokio::time::sleep(SESSION_IDLE_TIMEOUT - Duration::from_secs(60)).await;
        // Reading the session counts as activity.
        get_session(&state, view.id).await.unwrap();

        tokio::time::sleep(Duration::from_secs(120)).await;
        evict_idle_sessions(&state);
        assert!(state.sessions().contains_key(&view.id));
    }

    #[tokio::test(start_paused = true)]
    async fn advancing_restarts_the_countdown_cadence() {
        let state = test_state();
        let view = start_session(&state, start_request("Alice")).await.unwrap();
        let id = view.id;

        // Advance half a second into the first question's countdown.
        tokio::time::sleep(Duration::from_millis(500)).await;
        advance_session(&state, id).await.unwrap();

        // 600 ms later the first question's ticker would already have
        // fired; the respawned one must not have.
        tokio::time::sleep(Duration::from_millis(600)).await;
        let view = get_session(&state, id).await.unwrap();
        assert_eq!(view.remaining_seconds, Some(10));

        tokio::time::sleep(Duration::from_millis(500)).await;
        let view = get_session(&state, id).await.unwrap();
        assert_eq!(view.remaining_seconds, Some(9));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_forces_an_advance_after_ten_seconds() {
        let state = test_state();
        let view = start_session(&state, start_request("Alice")).await.unwrap();
        let id = view.id;

        tokio::time::sleep(Duration::from_secs(12)).await;

        let view = get_session(&state, id).await.unwrap();
        assert_eq!(view.question_index, 1);
        assert_eq!(view.phase, crate::dto::session::SessionPhaseDto::InProgress);
    }
}
