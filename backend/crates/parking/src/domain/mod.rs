//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (ParkingSpot, Ticket)
//! - Domain value objects (ParkingType, VehicleRegNumber)
//! - Fare policy (discount rules and the pricing chain)
//! - Repository traits (interfaces)

pub mod entities;
pub mod fare_policy;
pub mod repository;
pub mod value_objects;
