//! Exchange integration module
//!
//! The exchange collaborator contract and the order/account types that
//! cross it.

pub mod client;
pub mod order;

pub use client::*;
pub use order::*;
