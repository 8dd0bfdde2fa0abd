//! Execution module
//!
//! Order validation and the action dispatcher.

pub mod dispatcher;
pub mod validation;

pub use dispatcher::*;
pub use validation::*;
