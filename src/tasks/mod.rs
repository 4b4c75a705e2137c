//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache driver.
//!
//! # Tasks
//! - Expiry sweep: removes expired entries from the in-memory store at a fixed interval

mod sweep;

pub use sweep::spawn_sweep_task;
