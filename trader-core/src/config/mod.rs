//! Configuration module

pub mod indicators;
pub mod trading;

pub use indicators::*;
pub use trading::*;
