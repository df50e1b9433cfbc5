//! gitfleet - Live status across many git working copies
//!
//! gitfleet discovers repositories from a declarative location set,
//! classifies each one (clean or dirty, ahead or behind its upstream,
//! drifting from other remote branches) and folds the results into
//! fleet-wide counters.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to fleet)
//! - [`fleet`] - Locate, classify, summarize and report
//! - [`core`] - Domain types, location sets and configuration
//! - [`git`] - Single interface for all repository access
//! - [`ui`] - Console output
//! - [`telemetry`] - Tracing subscriber setup
//!
//! # Invariants
//!
//! 1. Repositories are only ever read, never modified
//! 2. Every refresh reclassifies every repository from scratch
//! 3. A failure in one repository never aborts the rest of the fleet

pub mod cli;
pub mod core;
pub mod fleet;
pub mod git;
pub mod telemetry;
pub mod ui;
