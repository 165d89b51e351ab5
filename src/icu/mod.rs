//! ICU message module for intl-catalog
//!
//! Handles message templates end to end:
//! - The element tree stored in compiled catalogs
//! - Parsing templates into that tree
//! - Formatting a tree (or a raw template) with placeholder values

pub mod ast;
pub mod format;
pub mod parser;

pub use ast::*;
pub use format::*;
pub use parser::*;
