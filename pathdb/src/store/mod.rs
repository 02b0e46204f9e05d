//! Storage backends.
//!
//! - [memory]: the whole tree in memory, linear scans, used as the reference
//!   engine and in tests
//! - [remote]: forwards to an external document database through a driver

pub mod memory;
pub mod remote;
