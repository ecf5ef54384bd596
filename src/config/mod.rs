//! Configuration module for listing sweeps
//!
//! This module provides the `SweepConfig` struct and its type-safe builder
//! for configuring a sweep with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, SweepConfigBuilder, WithBaseUrl};
pub use types::SweepConfig;
