//! RPFLayer - bounded in-memory subframe cache for RPF raster imagery
//!
//! This library provides the caching and geographic-coordination layer that
//! sits between an RPF catalog decoder (the "frame provider") and a map
//! rendering layer. Decompressing a subframe from its source catalog is
//! expensive; while a region of the earth is on screen this cache ensures
//! each subframe is decoded at most once and reused across repeated
//! repaint/pan/zoom cycles.
//!
//! # High-Level API
//!
//! The [`manager::CacheManager`] is the sole entry point for callers:
//!
//! ```ignore
//! use rpflayer::config::CacheConfig;
//! use rpflayer::manager::CacheManager;
//!
//! let mut manager = CacheManager::new(CacheConfig::default());
//! manager.set_frame_provider(provider);
//!
//! let tiles = manager.get_rectangle(&viewport, &projection);
//! ```
//!
//! A viewport that straddles the equator and/or the antimeridian is split
//! into up to four non-wrapping sub-rectangles, each served by its own
//! [`handler::CacheHandler`] with an independent LRU pool.

pub mod cache;
pub mod config;
pub mod coord;
pub mod coverage;
pub mod handler;
pub mod logging;
pub mod manager;
pub mod provider;
pub mod subframe;

/// Version of the RPFLayer library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
