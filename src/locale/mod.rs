//! Locale module for intl-catalog
//!
//! Handles everything between a locale preference and a message mapping:
//! - Normalizing locale tags to base codes
//! - Reading the ambient platform locale
//! - The code-to-catalog lookup table
//! - Asynchronously loading the resolved catalog

pub mod ambient;
pub mod code;
pub mod loader;
pub mod table;

pub use ambient::*;
pub use code::*;
pub use loader::*;
pub use table::*;
