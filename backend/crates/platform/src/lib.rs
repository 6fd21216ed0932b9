//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Time source abstraction (system clock, manual clock for tests)
//! - Console input reading for the interactive shell

pub mod clock;
pub mod console;
