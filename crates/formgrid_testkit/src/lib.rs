//! # FormGrid Testkit
//!
//! Test utilities for FormGrid.
//!
//! This crate provides:
//! - Fixture entity types (books, authors) with descriptors and `Entity`
//!   impls, modeled on a small library-management data set
//! - Seeded in-memory repositories and a failure-injecting repository
//! - Property-based test generators using proptest
//!
//! Cross-crate scenario tests live in this crate's `tests/` directory.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
