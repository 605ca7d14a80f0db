//! Adapters for the collaborators the application layer consumes.

pub mod error;
pub mod http;
pub mod storage;
pub mod telemetry;
