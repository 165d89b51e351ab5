//! State management module for intl-catalog
//!
//! - `app_state`: the application context owning the active locale and
//!   its message mapping

mod app_state;

pub use app_state::*;
