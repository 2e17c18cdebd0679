//! Core types and definitions for the spawnwave engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! placement geometry, pool configuration, sequencer phases, wave events
//! and tuning constants. It has no dependency on any host engine.

pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod types;

pub use glam;
