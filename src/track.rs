//! Tracks: one audio file's recognized tags plus pending changes.
//!
//! Tags are addressed through the closed [`TagAlias`] set. A [`Track`] is
//! built from a store snapshot, mutated in memory during a pass and then
//! persisted with a single [`Track::write`].

mod alias;
mod model;

pub use alias::*;
pub use model::*;

#[cfg(test)]
mod tests;
