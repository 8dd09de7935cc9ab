//! Google Sheets backend for the drill review tracker.
//!
//! The collection lives in one worksheet (default `problems`): a header row
//! followed by one row per record. Only the values API is used; obtaining
//! the OAuth access token is the caller's job.

mod client;
mod store;
mod table;

pub mod config;
pub mod error;

pub use config::SheetsConfig;
pub use error::{Error, Result};
pub use store::SheetsStore;
pub use table::HEADERS;

#[cfg(test)]
mod tests;
