//! UI module for intl-catalog
//!
//! The rendering layer that consumes loaded catalogs:
//! - `provider`: formats messages for one loaded locale
//! - `main_window`: the demo page with the language selector

pub mod main_window;
pub mod provider;

pub use main_window::*;
pub use provider::*;
