//! Trading loop module
//!
//! The two-cadence control loop and its consecutive-failure counter.

pub mod control_loop;
pub mod counter;

pub use control_loop::*;
pub use counter::*;
