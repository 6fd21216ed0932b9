//! In-Memory Repository Implementation
//!
//! Same contracts as the PostgreSQL repository, including the conditional
//! availability update and the exactly-one-row rule. Used by tests and by
//! `--in-memory` runs of the console app.

use crate::domain::entities::{ParkingSpot, Ticket};
use crate::domain::repository::{ParkingSpotRepository, RecurringUserRepository, TicketRepository};
use crate::domain::value_objects::{ParkingType, VehicleRegNumber};
use crate::error::{ParkingError, ParkingResult};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct State {
    spots: BTreeMap<i32, ParkingSpot>,
    tickets: Vec<Ticket>,
    recurring_users: HashSet<VehicleRegNumber>,
}

/// Process-local repository
#[derive(Debug, Default)]
pub struct InMemoryParkingRepository {
    state: Mutex<State>,
    fail_ticket_writes: AtomicBool,
    fail_spot_writes: AtomicBool,
}

impl InMemoryParkingRepository {
    /// Empty facility
    pub fn new() -> Self {
        Self::default()
    }

    /// Facility with `cars` car spots numbered from 1, then `bikes` bike spots
    ///
    /// `with_spots(3, 2)` matches the seeded database layout.
    pub fn with_spots(cars: i32, bikes: i32) -> Self {
        let repo = Self::new();
        {
            let mut state = repo.lock();
            for number in 1..=cars {
                state
                    .spots
                    .insert(number, ParkingSpot::new(number, ParkingType::Car, true));
            }
            for number in (cars + 1)..=(cars + bikes) {
                state
                    .spots
                    .insert(number, ParkingSpot::new(number, ParkingType::Bike, true));
            }
        }
        repo
    }

    /// Make ticket inserts and updates fail
    pub fn fail_ticket_writes(&self, fail: bool) {
        self.fail_ticket_writes.store(fail, Ordering::SeqCst);
    }

    /// Make spot availability updates fail
    pub fn fail_spot_writes(&self, fail: bool) {
        self.fail_spot_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of one spot
    pub fn spot(&self, number: i32) -> Option<ParkingSpot> {
        self.lock().spots.get(&number).copied()
    }

    /// Snapshot of every stored ticket, in insertion order
    pub fn tickets(&self) -> Vec<Ticket> {
        self.lock().tickets.clone()
    }

    pub fn recurring_user_count(&self) -> usize {
        self.lock().recurring_users.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(flag: &AtomicBool, operation: &str) -> ParkingResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(ParkingError::Persistence(format!(
                "{operation} rejected by in-memory store"
            )));
        }
        Ok(())
    }
}

fn expect_one_row(operation: &'static str, actual: u64) -> ParkingResult<()> {
    if actual == 1 {
        Ok(())
    } else {
        Err(ParkingError::UnexpectedRowCount {
            operation,
            expected: 1,
            actual,
        })
    }
}

impl ParkingSpotRepository for InMemoryParkingRepository {
    async fn next_available_spot(&self, parking_type: ParkingType) -> ParkingResult<Option<i32>> {
        let state = self.lock();
        let number = state
            .spots
            .values()
            .find(|spot| spot.available && spot.parking_type == parking_type)
            .map(|spot| spot.number);
        Ok(number)
    }

    async fn update_availability(&self, spot: &ParkingSpot) -> ParkingResult<()> {
        Self::check_writable(&self.fail_spot_writes, "update parking")?;

        let mut state = self.lock();
        let affected = match state.spots.get_mut(&spot.number) {
            Some(stored) if stored.available != spot.available => {
                stored.available = spot.available;
                1
            }
            _ => 0,
        };
        expect_one_row("update parking", affected)
    }
}

impl TicketRepository for InMemoryParkingRepository {
    async fn save_ticket(&self, ticket: &Ticket) -> ParkingResult<()> {
        Self::check_writable(&self.fail_ticket_writes, "insert ticket")?;

        let mut state = self.lock();
        if state.tickets.iter().any(|stored| stored.id == ticket.id) {
            return expect_one_row("insert ticket", 0);
        }
        state.tickets.push(ticket.clone());
        Ok(())
    }

    async fn find_latest_ticket(
        &self,
        vehicle: &VehicleRegNumber,
    ) -> ParkingResult<Option<Ticket>> {
        let state = self.lock();
        // Later insert wins a tie on in_time
        let latest = state
            .tickets
            .iter()
            .enumerate()
            .filter(|(_, ticket)| &ticket.vehicle_reg_number == vehicle)
            .max_by_key(|(index, ticket)| (ticket.in_time, *index))
            .map(|(_, ticket)| ticket.clone());
        Ok(latest)
    }

    async fn update_ticket(&self, ticket: &Ticket) -> ParkingResult<()> {
        Self::check_writable(&self.fail_ticket_writes, "update ticket")?;

        let mut state = self.lock();
        let affected = match state.tickets.iter_mut().find(|stored| stored.id == ticket.id) {
            Some(stored) => {
                stored.price = ticket.price;
                stored.out_time = ticket.out_time;
                1
            }
            None => 0,
        };
        expect_one_row("update ticket", affected)
    }
}

impl RecurringUserRepository for InMemoryParkingRepository {
    async fn is_recurring(&self, vehicle: &VehicleRegNumber) -> ParkingResult<bool> {
        Ok(self.lock().recurring_users.contains(vehicle))
    }

    async fn mark_recurring(&self, vehicle: &VehicleRegNumber) -> ParkingResult<()> {
        self.lock().recurring_users.insert(vehicle.clone());
        Ok(())
    }
}
