//! Cached motorsport session timing with lap, stint, telemetry and
//! track-geometry analysis.
//!
//! Paddock turns the raw, inconsistent lap and car-channel tables of an
//! upstream timing provider into validated, queryable sessions, and caches
//! them on disk so a session is downloaded once.
//!
//! # Features
//!
//! - **Idempotent caching**: content-fingerprinted entries, atomic publish
//! - **Typed sessions**: laps, compounds, stints and channels normalized once
//! - **Lap analysis**: fastest laps, quick-lap filtering, lap-time tables
//! - **Telemetry alignment**: distance-indexed speed traces for overlays
//! - **Stints**: per-driver and whole-field tyre strategy tables
//! - **Track geometry**: raw position outline for track maps
//!
//! # Architecture
//!
//! ```text
//!   TimingProvider ──► SessionLoader ──► Arc<Session> ──┬─► LapIndex
//!                          │   ▲                        ├─► align_by_distance
//!                          ▼   │                        ├─► StintSegmenter
//!                        CacheStore                     └─► track_shape
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use paddock::{ArchiveProvider, Engine, EngineConfig, types::SessionKind};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> paddock::Result<()> {
//!     let config = EngineConfig::default().with_env_overrides();
//!     let engine = Engine::new(config, ArchiveProvider::new("timing-archive"))?;
//!
//!     let session = engine.load(2024, "Monaco", SessionKind::Qualifying).await?;
//!     let lap = engine.fastest_lap(&session, "VER")?;
//!     println!("VER fastest: lap {} in {:?}", lap.lap_number, lap.lap_time);
//!
//!     for stint in engine.strategy(&session).stints {
//!         println!("{} {} {}-{}", stint.driver, stint.compound, stint.start_lap, stint.end_lap);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Loading and caching
pub mod cache;
pub mod config;
pub mod loader;
pub mod provider;
pub mod providers;
pub mod raw;

// Analyses
pub mod align;
pub mod geometry;
pub mod laps;
pub mod stints;

mod engine;

// Core exports
pub use error::*;

// Main API exports
pub use align::{DriverComparison, SpeedTrace, align_by_distance, compare_fastest_laps};
pub use cache::{CacheEntry, CacheStore, DiskCache, MemoryCache, PutOutcome};
pub use config::EngineConfig;
pub use engine::Engine;
pub use geometry::{session_track_shape, track_shape};
pub use laps::{DEFAULT_QUICK_LAP_THRESHOLD, LapIndex, LapTimeGroup};
pub use loader::{LoadSource, SessionLoader};
pub use provider::TimingProvider;
pub use providers::ArchiveProvider;
pub use stints::{Segmentation, StintSegmenter};
