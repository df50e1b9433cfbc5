//! core
//!
//! Core domain types, location sets and configuration for gitfleet.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, RefName, BranchRef, etc.
//! - [`locations`] - Location sets and their JSON store
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Paths are normalized once, on the way in

pub mod config;
pub mod locations;
pub mod types;
