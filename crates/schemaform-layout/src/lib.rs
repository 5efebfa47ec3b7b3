//! # schemaform-layout
//!
//! Page layout helpers consumed by the rendering layer.
//!
//! - [`grouper::group`] partitions a page's fields into standalone fields and
//!   group blocks, ordered by where each group's first member appears.
//! - [`options::resolve_options`] settles the option list for a select-family
//!   field once the caller has (or has failed to) fetch remote options.
//!
//! Neither helper takes part in validation.

pub mod grouper;
pub mod options;

pub use grouper::{group, page_layout, Block};
pub use options::{resolve_options, OptionSource, ResolvedOptions};
