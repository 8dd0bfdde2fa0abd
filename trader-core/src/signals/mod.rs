//! Signal engine module
//!
//! Turns a snapshot history into fixed-interval bars and multi-indicator
//! signal rows for the decision authority.

pub mod engine;
pub mod row;

pub use engine::*;
pub use row::*;
