//! Storage layer - records, pages and the database file.
//!
//! This module handles where records physically live:
//! - [`GameRecord`] - The fixed-layout record type
//! - [`page`] - The 4KB record arena and its header
//! - [`PageStore`] - The ordered set of pages
//! - [`DatabaseFile`] - Whole-store persistence
//! - [`loader`] - Tab-separated input parsing

mod database_file;
pub mod loader;
pub mod page;
mod page_store;
mod record;

pub use database_file::{DatabaseFile, FileHeader};
pub use loader::LoadReport;
pub use page_store::PageStore;
pub use record::{GameDate, GameRecord};
