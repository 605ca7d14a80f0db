//! Editorial core of a blog admin client.
//!
//! `domain` holds pure rules (slugs, excerpts, the post state machine),
//! `application` the session, access gate, post lifecycle and listing
//! services, `infra` the HTTP, storage and telemetry adapters, and `config`
//! the layered settings.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
