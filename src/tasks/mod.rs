//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: removes expired keys from the in-memory backend

mod expiry;

pub use expiry::spawn_expiry_task;
