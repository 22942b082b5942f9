#![forbid(unsafe_code)]

//! Core domain model and business logic for the Fittrack workout tracker.
//!
//! This crate provides:
//! - Domain types (exercises, workout templates, session records)
//! - The seeded exercise/workout catalog
//! - Persistence (single JSON document, atomic saves)
//! - The history ledger (streaks, aggregate and weekly statistics)
//! - The rest countdown timer
//! - The workout session engine

pub mod types;
pub mod error;
pub mod seed;
pub mod config;
pub mod logging;
pub mod store;
pub mod catalog;
pub mod ledger;
pub mod timer;
pub mod session;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use seed::seed_document;
pub use store::Store;
pub use ledger::WeeklyStats;
pub use timer::{CountdownTimer, TimerEvent};
pub use session::{EngineEvent, SessionEngine, SessionState, SessionSummary};
