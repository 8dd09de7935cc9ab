//! Core types and scheduling rules for the drill review tracker.
//!
//! This crate is deliberately free of file, database, and HTTP dependencies.
//! Storage backends implement [`store::Repository`]; the `drill` binary wires
//! one of them into a [`tracker::Tracker`].

pub mod date;
pub mod due;
pub mod engine;
pub mod error;
pub mod record;
pub mod store;
pub mod tracker;

pub use error::{Error, Result};
