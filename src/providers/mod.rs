//! Timing provider implementations

pub mod archive;

pub use archive::ArchiveProvider;
