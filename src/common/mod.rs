//! Common types and utilities shared across boxscore-db.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants
//! - Error types
//! - Identifiers (PageId, Location)

pub mod config;
pub mod error;
mod location;
mod page_id;

pub use error::{Error, Result};
pub use location::Location;
pub use page_id::PageId;
