#![deny(clippy::all, clippy::pedantic)]

pub mod auth;
pub mod posts;
