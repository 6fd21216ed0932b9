//! Ticket Lifecycle Use Case
//!
//! Entry allocates a spot and opens a ticket; exit closes the ticket, prices
//! the stay and frees the spot. Per ticket: `NONE -> OPEN -> CLOSED`.
//!
//! Steps run in order and stop at the first failure. Side effects of earlier
//! steps are left in place: a spot reserved for an entry whose ticket could
//! not be saved stays unavailable.

use crate::application::config::ParkingConfig;
use crate::application::recurring_users::RecurringUsers;
use crate::application::spot_allocator::SpotAllocator;
use crate::domain::entities::{ParkingSpot, Ticket};
use crate::domain::fare_policy::FarePolicy;
use crate::domain::repository::{ParkingSpotRepository, RecurringUserRepository, TicketRepository};
use crate::domain::value_objects::{ParkingType, VehicleRegNumber};
use crate::error::{ParkingError, ParkingResult};
use chrono::{DateTime, Utc};
use kernel::id::TicketId;
use platform::clock::{Clock, from_epoch_seconds};
use std::sync::Arc;

/// Output DTO for a completed exit
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub ticket_id: TicketId,
    pub vehicle: VehicleRegNumber,
    pub spot_number: i32,
    pub parking_type: ParkingType,
    pub in_time: i64,
    pub out_time: i64,
    pub duration_minutes: i64,
    pub price: f64,
    /// Whether the loyalty rule applied to this stay
    pub recurring: bool,
}

impl Receipt {
    pub fn in_time_utc(&self) -> DateTime<Utc> {
        from_epoch_seconds(self.in_time)
    }

    pub fn out_time_utc(&self) -> DateTime<Utc> {
        from_epoch_seconds(self.out_time)
    }
}

/// Ticket Lifecycle Use Case
pub struct TicketLifecycle<P, T, U>
where
    P: ParkingSpotRepository,
    T: TicketRepository,
    U: RecurringUserRepository,
{
    allocator: SpotAllocator<P>,
    ticket_repo: Arc<T>,
    recurring_users: RecurringUsers<U>,
    fare_policy: FarePolicy,
    config: Arc<ParkingConfig>,
    clock: Arc<dyn Clock>,
}

impl<R> TicketLifecycle<R, R, R>
where
    R: ParkingSpotRepository + TicketRepository + RecurringUserRepository,
{
    /// Wire every collaborator to one repository that implements all three traits
    pub fn from_repository(
        repo: Arc<R>,
        config: Arc<ParkingConfig>,
        clock: Arc<dyn Clock>,
    ) -> ParkingResult<Self> {
        Self::new(repo.clone(), repo.clone(), repo, config, clock)
    }
}

impl<P, T, U> TicketLifecycle<P, T, U>
where
    P: ParkingSpotRepository,
    T: TicketRepository,
    U: RecurringUserRepository,
{
    /// Fails if the configured discount chain is invalid
    pub fn new(
        spot_repo: Arc<P>,
        ticket_repo: Arc<T>,
        user_repo: Arc<U>,
        config: Arc<ParkingConfig>,
        clock: Arc<dyn Clock>,
    ) -> ParkingResult<Self> {
        let fare_policy = config.fare_policy()?;

        tracing::info!(
            fare_policy = %fare_policy,
            car_rate = config.car_rate_per_hour,
            bike_rate = config.bike_rate_per_hour,
            "Ticket lifecycle ready"
        );

        Ok(Self {
            allocator: SpotAllocator::new(spot_repo),
            ticket_repo,
            recurring_users: RecurringUsers::new(user_repo),
            fare_policy,
            config,
            clock,
        })
    }

    pub fn fare_policy(&self) -> &FarePolicy {
        &self.fare_policy
    }

    pub fn config(&self) -> &ParkingConfig {
        &self.config
    }

    /// Read-only lookup: the spot an entry of this type would get right now
    pub async fn next_parking_number_if_available(
        &self,
        parking_type: ParkingType,
    ) -> ParkingResult<Option<ParkingSpot>> {
        let spot = self
            .allocator
            .find_available(parking_type)
            .await?
            .map(|number| ParkingSpot::new(number, parking_type, true));
        Ok(spot)
    }

    /// Admit a vehicle
    ///
    /// ## Errors
    /// * [`ParkingError::SpotUnavailable`] - no free spot of this type; nothing is persisted
    /// * persistence errors from reserving the spot or saving the ticket
    pub async fn process_entry(
        &self,
        parking_type: ParkingType,
        vehicle: VehicleRegNumber,
    ) -> ParkingResult<Ticket> {
        let spot = self
            .next_parking_number_if_available(parking_type)
            .await?
            .ok_or(ParkingError::SpotUnavailable(parking_type))?;

        let spot = self.allocator.reserve(spot).await?;

        let ticket = Ticket::open(spot, vehicle, self.clock.now_epoch_seconds());
        self.ticket_repo.save_ticket(&ticket).await?;

        tracing::info!(
            ticket_id = %ticket.id,
            vehicle = %ticket.vehicle_reg_number,
            spot_number = ticket.parking_spot.number,
            in_time = ticket.in_time,
            "Vehicle entered"
        );

        Ok(ticket)
    }

    /// Let a vehicle out and charge it
    ///
    /// ## Errors
    /// * [`ParkingError::TicketNotFound`] - no ticket, or the latest one is already closed
    /// * [`ParkingError::InvalidDuration`] - the clock reads earlier than the entry time
    /// * persistence errors from any of the writes
    pub async fn process_exit(&self, vehicle: &VehicleRegNumber) -> ParkingResult<Receipt> {
        let mut ticket = self
            .ticket_repo
            .find_latest_ticket(vehicle)
            .await?
            .filter(Ticket::is_open)
            .ok_or_else(|| ParkingError::TicketNotFound(vehicle.to_string()))?;

        let out_time = self.clock.now_epoch_seconds();
        ticket.out_time = Some(out_time);

        let recurring = self.recurring_users.is_recurring(vehicle).await?;
        let hourly_rate = self.config.hourly_rate(ticket.parking_spot.parking_type);
        let price = self
            .fare_policy
            .calculate_fare(&ticket, hourly_rate, recurring)?;
        ticket.close(out_time, price);

        self.ticket_repo.update_ticket(&ticket).await?;
        self.allocator.release(ticket.parking_spot).await?;

        if !recurring {
            self.recurring_users.mark_completed(vehicle).await?;
        }

        let duration_minutes = ticket.duration_minutes()?;

        tracing::info!(
            ticket_id = %ticket.id,
            vehicle = %vehicle,
            spot_number = ticket.parking_spot.number,
            duration_minutes = duration_minutes,
            price = price,
            recurring = recurring,
            "Vehicle exited"
        );

        Ok(Receipt {
            ticket_id: ticket.id,
            vehicle: ticket.vehicle_reg_number,
            spot_number: ticket.parking_spot.number,
            parking_type: ticket.parking_spot.parking_type,
            in_time: ticket.in_time,
            out_time,
            duration_minutes,
            price,
            recurring,
        })
    }
}
