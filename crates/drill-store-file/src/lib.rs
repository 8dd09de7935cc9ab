//! JSON file backend for the drill review tracker.
//!
//! The file holds a single object, `{"problems": {<id>: <record>, ...}}`,
//! the same layout earlier versions of the tool wrote, so existing files load
//! unchanged.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::FileStore;
