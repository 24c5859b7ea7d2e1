//! Library module: finding tracks on disk and grouping them for a pass.
//!
//! Scanning lives in `library::scan`, partitioning in `library::group` and
//! per-alias value counts in `library::stats`.

mod group;
mod scan;
mod stats;

pub use group::*;
pub use scan::*;
pub use stats::*;
