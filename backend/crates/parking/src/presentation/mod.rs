//! Presentation Layer - Interactive console

pub mod command;
pub mod shell;
