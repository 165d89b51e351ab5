//! Catalog module for intl-catalog
//!
//! Handles the catalog files on disk:
//! - Source (authored) and compiled catalog formats
//! - Listing a catalog directory
//! - Size-limited reads and atomic writes

pub mod compiled;
pub mod io;
pub mod scanner;
pub mod source;

pub use compiled::*;
pub use io::*;
pub use scanner::*;
pub use source::*;
