//! mockmate-core — interview model, answer scoring, and attempt lifecycle.
//!
//! This crate defines the document shapes, the shared answer scorer, the
//! attempt state machine, and the traits implemented by the store and
//! generator collaborator crates.

pub mod config;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod scoring;
pub mod traits;
