//! Domain layer types and invariants.

pub mod error;
pub mod excerpt;
pub mod field;
pub mod lifecycle;
pub mod session;
pub mod slug;
pub mod tags;
pub mod types;
