//! Business logic between the HTTP/GraphQL surfaces and the state/dao layers.

/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Result validation and persistence shared by REST and GraphQL.
pub mod result_service;
/// Quiz session hosting, countdown timers, and submission.
pub mod session_service;
