//! idlesweep-core - Core library for the idle-session shutdown monitor
//!
//! This crate provides the shared logic behind the idlesweep CLI:
//!
//! - **decision**: pure terminate/skip decision engine
//! - **sweep**: drivers for the scheduled and alarm-triggered sweep modes
//! - **client**: session directory and metrics store API clients
//! - **event**: typed alarm invocation payload
//! - **types**: session and metric entities

pub mod client;
pub mod decision;
pub mod error;
pub mod event;
pub mod sweep;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use sweep::{SweepConfig, SweepDriver, SweepReport};
