//! ui
//!
//! User-facing console output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware printing and list formatting

pub mod output;
