//! Spot Allocator
//!
//! Finds and flips parking spots. Holds no state of its own: every call goes
//! straight to the repository.

use crate::domain::entities::ParkingSpot;
use crate::domain::repository::ParkingSpotRepository;
use crate::domain::value_objects::ParkingType;
use crate::error::ParkingResult;
use std::sync::Arc;

/// Spot Allocator
pub struct SpotAllocator<P>
where
    P: ParkingSpotRepository,
{
    spot_repo: Arc<P>,
}

impl<P> SpotAllocator<P>
where
    P: ParkingSpotRepository,
{
    pub fn new(spot_repo: Arc<P>) -> Self {
        Self { spot_repo }
    }

    /// Lowest-numbered free spot of the given type
    pub async fn find_available(&self, parking_type: ParkingType) -> ParkingResult<Option<i32>> {
        let spot_number = self.spot_repo.next_available_spot(parking_type).await?;

        tracing::debug!(
            parking_type = %parking_type,
            spot_number = ?spot_number,
            "Looked up available spot"
        );

        Ok(spot_number)
    }

    /// Mark the spot as taken
    pub async fn reserve(&self, spot: ParkingSpot) -> ParkingResult<ParkingSpot> {
        let spot = spot.with_available(false);
        self.spot_repo.update_availability(&spot).await?;

        tracing::info!(
            spot_number = spot.number,
            parking_type = %spot.parking_type,
            "Spot reserved"
        );

        Ok(spot)
    }

    /// Mark the spot as free again
    pub async fn release(&self, spot: ParkingSpot) -> ParkingResult<ParkingSpot> {
        let spot = spot.with_available(true);
        self.spot_repo.update_availability(&spot).await?;

        tracing::info!(
            spot_number = spot.number,
            parking_type = %spot.parking_type,
            "Spot released"
        );

        Ok(spot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParkingError;
    use crate::infra::memory::InMemoryParkingRepository;

    fn allocator(
        cars: i32,
        bikes: i32,
    ) -> (
        SpotAllocator<InMemoryParkingRepository>,
        Arc<InMemoryParkingRepository>,
    ) {
        let repo = Arc::new(InMemoryParkingRepository::with_spots(cars, bikes));
        (SpotAllocator::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_find_available_picks_lowest_number() {
        let (allocator, _) = allocator(3, 2);
        assert_eq!(allocator.find_available(ParkingType::Car).await.unwrap(), Some(1));
        assert_eq!(allocator.find_available(ParkingType::Bike).await.unwrap(), Some(4));
    }

    #[tokio::test]
    async fn test_reserve_then_release() {
        let (allocator, repo) = allocator(2, 0);

        let spot = ParkingSpot::new(1, ParkingType::Car, true);
        let reserved = allocator.reserve(spot).await.unwrap();
        assert!(!reserved.available);
        assert_eq!(repo.spot(1).map(|s| s.available), Some(false));
        assert_eq!(allocator.find_available(ParkingType::Car).await.unwrap(), Some(2));

        allocator.release(reserved).await.unwrap();
        assert_eq!(repo.spot(1).map(|s| s.available), Some(true));
        assert_eq!(allocator.find_available(ParkingType::Car).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_exhausted_type_yields_none() {
        let (allocator, _) = allocator(1, 1);
        allocator
            .reserve(ParkingSpot::new(1, ParkingType::Car, true))
            .await
            .unwrap();

        assert_eq!(allocator.find_available(ParkingType::Car).await.unwrap(), None);
        assert_eq!(allocator.find_available(ParkingType::Bike).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_unknown_spot_is_a_row_count_failure() {
        let (allocator, _) = allocator(1, 0);
        let result = allocator
            .reserve(ParkingSpot::new(42, ParkingType::Car, true))
            .await;

        assert!(matches!(
            result,
            Err(ParkingError::UnexpectedRowCount { actual: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let (allocator, repo) = allocator(1, 0);
        repo.fail_spot_writes(true);

        let result = allocator
            .reserve(ParkingSpot::new(1, ParkingType::Car, true))
            .await;
        assert!(matches!(result, Err(ParkingError::Persistence(_))));
    }
}
