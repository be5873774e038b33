//! HTTP route trees composed into the application router.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// GraphQL endpoint.
pub mod graphql;
/// Health check endpoint.
pub mod health;
/// Direct result submission endpoint.
pub mod results;
/// Hosted session flow endpoints.
pub mod session;

/// Compose all route trees, wiring in shared state and the Swagger UI.
pub fn router(state: SharedState) -> Router<()> {
    let swagger: Router<SharedState> = SwaggerUi::new("/docs")
        .url("/api-doc/openapi.json", ApiDoc::openapi())
        .into();

    health::router()
        .merge(results::router())
        .merge(session::router())
        .merge(graphql::router(state.clone()))
        .merge(swagger)
        .with_state(state)
}
