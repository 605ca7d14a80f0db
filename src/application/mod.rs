//! Application services: session, access gate, post lifecycle and listings.

pub mod error;
pub mod gate;
pub mod inflight;
pub mod listing;
pub mod ports;
pub mod posts;
pub mod session;
