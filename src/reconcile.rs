//! The reconciliation steps of a pass, each a pure function over the
//! in-memory track set. Sequencing lives in [`crate::archive`].

mod album;
mod artist;
mod filename;
mod gate;
mod report;

pub use album::*;
pub use artist::*;
pub use filename::*;
pub use gate::*;
pub use report::*;
