//! Core types, state store, and pure query functions for the job board.
//!
//! This crate has no database dependencies. Storage
//! backends implement [`kv::KeyValueStore`]; the [`board::JobBoard`] owns one
//! and mirrors the `jobs`, `applications`, and `feedbacks` collections into
//! it on every mutation.

pub mod analytics;
pub mod application;
pub mod board;
pub mod error;
pub mod feedback;
pub mod job;
pub mod kv;
pub mod matching;
pub mod search;
pub mod seed;

pub use board::{BoardOptions, FeedbackPolicy, JobBoard, Snapshot};
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
