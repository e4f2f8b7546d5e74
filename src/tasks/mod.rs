//! Background Tasks Module
//!
//! # Tasks
//! - TTL Sweep: Removes expired cache entries at a fixed interval

mod sweep;

pub use sweep::spawn_sweep_task;
