//! Library crate for quiz-relay-back, exposing modules for binaries and integration tests.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod graphql;
pub mod routes;
pub mod services;
pub mod state;
