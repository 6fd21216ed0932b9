//! Parking Facility Core
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, fare policy, repository traits
//! - `application/` - Use cases (spot allocation, recurring users, ticket lifecycle)
//! - `infra/` - PostgreSQL and in-memory repository implementations
//! - `presentation/` - Interactive console shell
//!
//! ## Operating Model
//! - One entry or exit is processed completely before the next is accepted
//! - A spot is unavailable exactly while an open ticket holds it
//! - Fares are computed once, at exit, by the configured [`FarePolicy`]

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::ParkingConfig;
pub use application::ticket_lifecycle::{Receipt, TicketLifecycle};
pub use domain::entities::{ParkingSpot, Ticket, TicketStatus};
pub use domain::fare_policy::{DiscountRule, FarePolicy};
pub use domain::value_objects::{ParkingType, VehicleRegNumber};
pub use error::{ParkingError, ParkingResult};
pub use infra::memory::InMemoryParkingRepository;
pub use infra::postgres::PgParkingRepository;
pub use presentation::shell::InteractiveShell;

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};
