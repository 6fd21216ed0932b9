//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.
//! Every write must touch exactly one record; implementations report anything
//! else as [`crate::error::ParkingError::UnexpectedRowCount`].

use crate::domain::entities::{ParkingSpot, Ticket};
use crate::domain::value_objects::{ParkingType, VehicleRegNumber};
use crate::error::ParkingResult;

/// Parking spot repository trait
#[trait_variant::make(ParkingSpotRepository: Send)]
pub trait LocalParkingSpotRepository {
    /// Lowest-numbered available spot of the given type
    async fn next_available_spot(&self, parking_type: ParkingType) -> ParkingResult<Option<i32>>;

    /// Persist the spot's availability flag
    async fn update_availability(&self, spot: &ParkingSpot) -> ParkingResult<()>;
}

/// Ticket repository trait
#[trait_variant::make(TicketRepository: Send)]
pub trait LocalTicketRepository {
    /// Insert a new ticket
    async fn save_ticket(&self, ticket: &Ticket) -> ParkingResult<()>;

    /// Most recent ticket (by entry time) for a vehicle, open or closed
    async fn find_latest_ticket(
        &self,
        vehicle: &VehicleRegNumber,
    ) -> ParkingResult<Option<Ticket>>;

    /// Persist exit time and price
    async fn update_ticket(&self, ticket: &Ticket) -> ParkingResult<()>;
}

/// Recurring user repository trait
#[trait_variant::make(RecurringUserRepository: Send)]
pub trait LocalRecurringUserRepository {
    async fn is_recurring(&self, vehicle: &VehicleRegNumber) -> ParkingResult<bool>;

    /// Add the vehicle; adding an existing member is a no-op
    async fn mark_recurring(&self, vehicle: &VehicleRegNumber) -> ParkingResult<()>;
}
