//! Compiler module for intl-catalog
//!
//! Handles the `compile-messages` build task:
//! - Backends that compile a single catalog file
//! - Concurrent batch compilation with a per-file report

pub mod backend;
pub mod batch;

pub use backend::*;
pub use batch::*;
