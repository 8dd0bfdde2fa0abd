//! Decision module
//!
//! The typed decision returned by the decision authority and the
//! authority's contract.

pub mod action;
pub mod authority;

pub use action::*;
pub use authority::*;
