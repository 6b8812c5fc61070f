//! Nullable infrastructure for deterministic testing.
//!
//! The engines never read a clock or perform a real call. The host supplies
//! the chain position and carries out dispatched actions. This crate provides
//! test-friendly stand-ins for both that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what was asked of them
//!
//! Usage: drive engines with a `NullChain` and dispatch into a
//! `RecordingHandler` in tests and scenario replays.

pub mod chain;
pub mod handler;

pub use chain::NullChain;
pub use handler::RecordingHandler;
