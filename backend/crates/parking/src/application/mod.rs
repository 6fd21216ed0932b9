//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod config;
pub mod recurring_users;
pub mod spot_allocator;
pub mod ticket_lifecycle;
