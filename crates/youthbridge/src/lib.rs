//! Core library for the youth verification and opportunity matching platform.
//!
//! The crate is organized as a set of workflows (directory, verification,
//! opportunities, roster intake), each exposing a typed service facade and an
//! axum router. Storage is abstracted behind repository traits so the service
//! binary and tests can provide their own implementations.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
