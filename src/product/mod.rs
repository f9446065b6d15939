//! Product-specific store integration, including stock management actions.

mod actions;
pub mod entity;

pub use actions::*;
