//! Reporting utilities: text summaries and status messages.

pub mod format;

pub use format::*;
