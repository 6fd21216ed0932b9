//! Recurring-User Registry
//!
//! Vehicles with at least one completed paid stay. Membership unlocks the
//! loyalty rule on later stays.

use crate::domain::repository::RecurringUserRepository;
use crate::domain::value_objects::VehicleRegNumber;
use crate::error::ParkingResult;
use std::sync::Arc;

/// Recurring-User Registry
pub struct RecurringUsers<U>
where
    U: RecurringUserRepository,
{
    user_repo: Arc<U>,
}

impl<U> RecurringUsers<U>
where
    U: RecurringUserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn is_recurring(&self, vehicle: &VehicleRegNumber) -> ParkingResult<bool> {
        self.user_repo.is_recurring(vehicle).await
    }

    /// Record a completed stay; repeating it is harmless
    pub async fn mark_completed(&self, vehicle: &VehicleRegNumber) -> ParkingResult<()> {
        self.user_repo.mark_recurring(vehicle).await?;

        tracing::info!(vehicle = %vehicle, "Vehicle registered as recurring user");

        Ok(())
    }
}
