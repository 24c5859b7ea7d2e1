//! Cover art: which image file wins for a directory, and how it becomes
//! embeddable bytes.

mod codec;
mod select;
#[cfg(test)]
pub(crate) mod stub;

pub use codec::*;
pub use select::*;
