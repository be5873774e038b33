use tracing::warn;

use crate::{
    dto::health::{HealthResponse, HealthStatus},
    state::SharedState,
};

/// Probe the result store and report the backend's current health.
///
/// A failed ping reports degraded immediately instead of waiting for the
/// background supervisor to notice and drop the store.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let status = match state.result_store().await {
        Some(store) => match store.health_check().await {
            Ok(()) => HealthStatus::Ok,
            Err(err) => {
                warn!(error = %err, "storage health check failed");
                HealthStatus::Degraded
            }
        },
        None => HealthStatus::Degraded,
    };

    status.into()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::future::BoxFuture;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::{NewResultRecord, ResultRecordEntity},
            result_store::ResultStore,
            storage::{StorageError, StorageResult},
        },
        state::AppState,
    };

    struct PingOnlyStore {
        healthy: bool,
    }

    impl ResultStore for PingOnlyStore {
        fn insert_result(
            &self,
            _record: NewResultRecord,
        ) -> BoxFuture<'static, StorageResult<ResultRecordEntity>> {
            unimplemented!("not exercised by health checks")
        }

        fn list_results(&self) -> BoxFuture<'static, StorageResult<Vec<ResultRecordEntity>>> {
            unimplemented!("not exercised by health checks")
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            let healthy = self.healthy;
            Box::pin(async move {
                if healthy {
                    Ok(())
                } else {
                    Err(StorageError::unavailable(
                        "ping failed".into(),
                        std::io::Error::other("connection reset"),
                    ))
                }
            })
        }
    }

    #[tokio::test]
    async fn reports_ok_with_a_healthy_store() {
        let state = AppState::new(AppConfig::default());
        state
            .install_result_store(Arc::new(PingOnlyStore { healthy: true }))
            .await;

        let response = health_status(&state).await;
        assert_eq!(response.status, HealthStatus::Ok);
        assert!(!state.is_degraded().await);
    }

    #[tokio::test]
    async fn reports_degraded_without_a_store() {
        let state = AppState::new(AppConfig::default());

        let response = health_status(&state).await;
        assert_eq!(response.status, HealthStatus::Degraded);
        assert!(state.is_degraded().await);
    }

    #[tokio::test]
    async fn reports_degraded_when_the_ping_fails() {
        let state = AppState::new(AppConfig::default());
        state
            .install_result_store(Arc::new(PingOnlyStore { healthy: false }))
            .await;

        let response = health_status(&state).await;
        assert_eq!(response.status, HealthStatus::Degraded);
    }
}
