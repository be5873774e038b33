//! Wire-facing request and response types.

/// Health check payloads.
pub mod health;
/// Result submission payloads.
pub mod result;
/// Session request payloads and projections.
pub mod session;
/// Validation helpers shared by request types.
pub mod validation;
