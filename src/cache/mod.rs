//! Subframe cache internals.
//!
//! Provides the fixed-capacity LRU pool of subframe slots and the sparse
//! 2-D index matrix that maps local tile coordinates to (slot, expected
//! version) pairs.

mod lru;
mod matrix;

pub use lru::SubframeCache;
pub use matrix::{CellState, IndexMatrix};
