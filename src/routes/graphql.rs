use async_graphql_axum::GraphQL;
use axum::Router;

use crate::{graphql::build_schema, state::SharedState};

/// Serve the GraphQL schema (query `getResults`, mutation `saveResult`).
pub fn router(state: SharedState) -> Router<SharedState> {
    let schema = build_schema(state);
    Router::new().route_service("/graphql", GraphQL::new(schema))
}
