//! Core library for the TA posting application portal.
//!
//! Students browse seeded course postings and submit applications with
//! document references; professors review applications and move them
//! through the review pipeline. All state is session-local and mirrored
//! to a small key/value store.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
