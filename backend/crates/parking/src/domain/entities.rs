//! Domain Entities
//!
//! Core business entities for the parking domain.

use kernel::id::TicketId;

use crate::domain::value_objects::{ParkingType, VehicleRegNumber};
use crate::error::{ParkingError, ParkingResult};

/// One physical parking spot
///
/// Identity is `number`; two snapshots of the same spot compare equal even if
/// their availability differs.
#[derive(Debug, Clone, Copy)]
pub struct ParkingSpot {
    pub number: i32,
    pub parking_type: ParkingType,
    pub available: bool,
}

impl ParkingSpot {
    pub fn new(number: i32, parking_type: ParkingType, available: bool) -> Self {
        Self {
            number,
            parking_type,
            available,
        }
    }

    /// Copy of this spot with the availability flag flipped
    pub fn with_available(self, available: bool) -> Self {
        Self { available, ..self }
    }
}

impl PartialEq for ParkingSpot {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for ParkingSpot {}

/// Lifecycle state of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    Closed,
}

/// Ticket entity - one vehicle's stay, from entry to exit
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    pub parking_spot: ParkingSpot,
    pub vehicle_reg_number: VehicleRegNumber,
    /// Entry instant, seconds since epoch
    pub in_time: i64,
    /// Exit instant, seconds since epoch; `None` while the vehicle is parked
    pub out_time: Option<i64>,
    pub price: f64,
}

impl Ticket {
    /// Open a ticket for a vehicle entering now
    pub fn open(
        parking_spot: ParkingSpot,
        vehicle_reg_number: VehicleRegNumber,
        in_time: i64,
    ) -> Self {
        Self {
            id: TicketId::new(),
            parking_spot: parking_spot.with_available(false),
            vehicle_reg_number,
            in_time,
            out_time: None,
            price: 0.0,
        }
    }

    pub fn status(&self) -> TicketStatus {
        match self.out_time {
            Some(_) => TicketStatus::Closed,
            None => TicketStatus::Open,
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status() == TicketStatus::Open
    }

    /// Whole minutes parked, truncated
    ///
    /// Fails with [`ParkingError::InvalidDuration`] while the ticket is open or
    /// when the exit instant precedes the entry instant.
    pub fn duration_minutes(&self) -> ParkingResult<i64> {
        match self.out_time {
            Some(out_time) if out_time >= self.in_time => Ok((out_time - self.in_time) / 60),
            out_time => Err(ParkingError::InvalidDuration {
                in_time: self.in_time,
                out_time,
            }),
        }
    }

    /// Close the ticket with the given exit instant and fare
    pub fn close(&mut self, out_time: i64, price: f64) {
        self.out_time = Some(out_time);
        self.price = price;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate() -> VehicleRegNumber {
        VehicleRegNumber::new("ABCDEF").unwrap()
    }

    #[test]
    fn test_open_ticket_defaults() {
        let spot = ParkingSpot::new(1, ParkingType::Car, true);
        let ticket = Ticket::open(spot, plate(), 3600);

        assert!(ticket.is_open());
        assert_eq!(ticket.price, 0.0);
        assert_eq!(ticket.out_time, None);
        assert!(!ticket.parking_spot.available);
    }

    #[test]
    fn test_duration_truncates_to_minutes() {
        let spot = ParkingSpot::new(1, ParkingType::Car, true);
        let mut ticket = Ticket::open(spot, plate(), 3600);
        ticket.close(3600 + 45 * 60 + 59, 0.0);

        assert_eq!(ticket.duration_minutes().unwrap(), 45);
        assert_eq!(ticket.status(), TicketStatus::Closed);
    }

    #[test]
    fn test_duration_of_open_ticket_is_invalid() {
        let spot = ParkingSpot::new(1, ParkingType::Car, true);
        let ticket = Ticket::open(spot, plate(), 3600);

        assert!(matches!(
            ticket.duration_minutes(),
            Err(ParkingError::InvalidDuration { out_time: None, .. })
        ));
    }

    #[test]
    fn test_exit_before_entry_is_invalid() {
        let spot = ParkingSpot::new(1, ParkingType::Car, true);
        let mut ticket = Ticket::open(spot, plate(), 7600);
        ticket.close(7200, 0.0);

        assert!(matches!(
            ticket.duration_minutes(),
            Err(ParkingError::InvalidDuration {
                in_time: 7600,
                out_time: Some(7200)
            })
        ));
    }

    #[test]
    fn test_spot_identity_is_number() {
        let a = ParkingSpot::new(3, ParkingType::Car, true);
        let b = ParkingSpot::new(3, ParkingType::Car, false);
        let c = ParkingSpot::new(4, ParkingType::Car, true);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
