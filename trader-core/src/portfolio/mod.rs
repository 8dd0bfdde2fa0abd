//! Portfolio module
//!
//! Account figures as presented to the decision authority.

pub mod balance;

pub use balance::*;
