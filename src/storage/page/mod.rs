//! Page types and layout.
//!
//! This module contains:
//! - [`Page`] - The 4KB arena of packed records
//! - [`PageHeader`] - Metadata written in front of every page image

#[allow(clippy::module_inception)]
mod page;
mod page_header;

pub use page::Page;
pub use page_header::PageHeader;
