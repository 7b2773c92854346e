//! Shared test utilities for the genlink workspace.
//!
//! This crate provides fixtures used across crate test suites. It is a
//! dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`memory`]: [`MemoryFs`], an in-memory [`genlink_fs::FsProbe`]
//! - [`system`]: [`TestSystem`], a temporary root with a store and manifests

pub mod memory;
pub mod system;

pub use memory::MemoryFs;
pub use system::TestSystem;
