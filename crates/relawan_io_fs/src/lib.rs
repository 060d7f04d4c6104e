//! `relawan_io_fs` v1:
//! Source discovery for registry snapshot files.
//!
//! Module layout:
//! - `select` : listing and newest-snapshot selection
//! - `spec`   : entries/selection models and errors
//! - `util`   : pattern compilation helpers

pub mod select;
pub mod spec;
mod util;

pub use select::{list_source_entries, select_newest_source, select_sources};
pub use spec::{SelectSourceError, SpecSourceEntry, SpecSourceSelection};
