//! PostgreSQL Repository Implementations

use crate::domain::entities::{ParkingSpot, Ticket};
use crate::domain::repository::{ParkingSpotRepository, RecurringUserRepository, TicketRepository};
use crate::domain::value_objects::{ParkingType, VehicleRegNumber};
use crate::error::{ParkingError, ParkingResult};
use kernel::id::TicketId;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgParkingRepository {
    pool: PgPool,
}

impl PgParkingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Free every spot and clear all tickets and recurring users
    pub async fn reset(&self) -> ParkingResult<()> {
        let mut tx = self.pool.begin().await?;

        let spots_freed = sqlx::query("UPDATE parking SET available = TRUE WHERE NOT available")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("TRUNCATE TABLE ticket, recurring_user")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(spots_freed = spots_freed, "Parking data reset");

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

impl ParkingSpotRepository for PgParkingRepository {
    async fn next_available_spot(&self, parking_type: ParkingType) -> ParkingResult<Option<i32>> {
        let number = sqlx::query_scalar::<_, Option<i32>>(
            r#"
            SELECT MIN(parking_number)
            FROM parking
            WHERE available AND parking_type = $1
            "#,
        )
        .bind(parking_type.code())
        .fetch_one(&self.pool)
        .await?;

        Ok(number)
    }

    async fn update_availability(&self, spot: &ParkingSpot) -> ParkingResult<()> {
        // Only flips a spot that is still in the opposite state
        let affected = sqlx::query(
            r#"
            UPDATE parking
            SET available = $1
            WHERE parking_number = $2 AND available = $3
            "#,
        )
        .bind(spot.available)
        .bind(spot.number)
        .bind(!spot.available)
        .execute(&self.pool)
        .await?
        .rows_affected();

        expect_one_row("update parking", affected)
    }
}

impl TicketRepository for PgParkingRepository {
    async fn save_ticket(&self, ticket: &Ticket) -> ParkingResult<()> {
        let affected = sqlx::query(
            r#"
            INSERT INTO ticket (
                ticket_id,
                parking_number,
                vehicle_reg_number,
                price,
                in_time,
                out_time
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(ticket.id.into_uuid())
        .bind(ticket.parking_spot.number)
        .bind(ticket.vehicle_reg_number.as_str())
        .bind(ticket.price)
        .bind(ticket.in_time)
        .bind(ticket.out_time)
        .execute(&self.pool)
        .await?
        .rows_affected();

        expect_one_row("insert ticket", affected)
    }

    async fn find_latest_ticket(
        &self,
        vehicle: &VehicleRegNumber,
    ) -> ParkingResult<Option<Ticket>> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT
                t.ticket_id,
                t.parking_number,
                p.parking_type,
                p.available,
                t.vehicle_reg_number,
                t.price,
                t.in_time,
                t.out_time
            FROM ticket t
            JOIN parking p ON p.parking_number = t.parking_number
            WHERE t.vehicle_reg_number = $1
            ORDER BY t.in_time DESC, t.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TicketRow::into_ticket).transpose()
    }

    async fn update_ticket(&self, ticket: &Ticket) -> ParkingResult<()> {
        let affected = sqlx::query(
            r#"
            UPDATE ticket
            SET price = $1, out_time = $2
            WHERE ticket_id = $3
            "#,
        )
        .bind(ticket.price)
        .bind(ticket.out_time)
        .bind(ticket.id.into_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        expect_one_row("update ticket", affected)
    }
}

impl RecurringUserRepository for PgParkingRepository {
    async fn is_recurring(&self, vehicle: &VehicleRegNumber) -> ParkingResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM recurring_user WHERE vehicle_reg_number = $1)",
        )
        .bind(vehicle.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn mark_recurring(&self, vehicle: &VehicleRegNumber) -> ParkingResult<()> {
        sqlx::query(
            r#"
            INSERT INTO recurring_user (vehicle_reg_number)
            VALUES ($1)
            ON CONFLICT (vehicle_reg_number) DO NOTHING
            "#,
        )
        .bind(vehicle.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct TicketRow {
    ticket_id: Uuid,
    parking_number: i32,
    parking_type: String,
    available: bool,
    vehicle_reg_number: String,
    price: f64,
    in_time: i64,
    out_time: Option<i64>,
}

impl TicketRow {
    fn into_ticket(self) -> ParkingResult<Ticket> {
        Ok(Ticket {
            id: TicketId::from_uuid(self.ticket_id),
            parking_spot: ParkingSpot::new(
                self.parking_number,
                ParkingType::parse(&self.parking_type)?,
                self.available,
            ),
            vehicle_reg_number: VehicleRegNumber::from_db(self.vehicle_reg_number),
            in_time: self.in_time,
            out_time: self.out_time,
            price: self.price,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Tests against a live database are `#[ignore]`d; run them with
    //! `DATABASE_URL=... cargo test -p parking -- --ignored` on a throwaway
    //! Postgres. Each test calls `reset()`, so they hold a lock to run one at a time.

    use super::*;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    static DATABASE_LOCK: Mutex<()> = Mutex::new(());

    fn plate(value: &str) -> VehicleRegNumber {
        VehicleRegNumber::new(value).unwrap()
    }

    async fn connect() -> (PgParkingRepository, MutexGuard<'static, ()>) {
        let guard = DATABASE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for --ignored tests");
        let pool = PgPool::connect(&url).await.unwrap();
        sqlx::migrate!("../../../database/migrations")
            .run(&pool)
            .await
            .unwrap();
        let repo = PgParkingRepository::new(pool);
        repo.reset().await.unwrap();
        (repo, guard)
    }

    #[test]
    fn test_expect_one_row() {
        assert!(expect_one_row("update parking", 1).is_ok());
        assert!(matches!(
            expect_one_row("update parking", 0),
            Err(ParkingError::UnexpectedRowCount {
                operation: "update parking",
                expected: 1,
                actual: 0,
            })
        ));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_double_reserve_is_rejected() {
        let (repo, _guard) = connect().await;

        assert_eq!(repo.next_available_spot(ParkingType::Car).await.unwrap(), Some(1));
        assert_eq!(repo.next_available_spot(ParkingType::Bike).await.unwrap(), Some(4));

        let reserved = ParkingSpot::new(1, ParkingType::Car, false);
        repo.update_availability(&reserved).await.unwrap();
        assert!(matches!(
            repo.update_availability(&reserved).await,
            Err(ParkingError::UnexpectedRowCount { actual: 0, .. })
        ));
        assert_eq!(repo.next_available_spot(ParkingType::Car).await.unwrap(), Some(2));

        let released = reserved.with_available(true);
        repo.update_availability(&released).await.unwrap();
        assert!(repo.update_availability(&released).await.is_err());
        assert_eq!(repo.next_available_spot(ParkingType::Car).await.unwrap(), Some(1));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_unknown_spot_is_rejected() {
        let (repo, _guard) = connect().await;

        let missing = ParkingSpot::new(99, ParkingType::Car, false);
        assert!(matches!(
            repo.update_availability(&missing).await,
            Err(ParkingError::UnexpectedRowCount { actual: 0, .. })
        ));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_ticket_save_find_update() {
        let (repo, _guard) = connect().await;
        let spot = ParkingSpot::new(4, ParkingType::Bike, false);
        repo.update_availability(&spot).await.unwrap();

        let mut ticket = Ticket::open(spot, plate("pg-1"), 1_000);
        repo.save_ticket(&ticket).await.unwrap();

        let found = repo.find_latest_ticket(&plate("PG-1")).await.unwrap().unwrap();
        assert_eq!(found.id, ticket.id);
        assert!(found.is_open());
        assert_eq!(found.parking_spot.parking_type, ParkingType::Bike);
        assert!(!found.parking_spot.available);

        ticket.close(4_600, 1.0);
        repo.update_ticket(&ticket).await.unwrap();

        let found = repo.find_latest_ticket(&plate("PG-1")).await.unwrap().unwrap();
        assert_eq!(found.out_time, Some(4_600));
        assert_eq!(found.price, 1.0);
        assert!(repo.find_latest_ticket(&plate("NOPE")).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_latest_ticket_by_in_time() {
        let (repo, _guard) = connect().await;
        let older = Ticket::open(ParkingSpot::new(2, ParkingType::Car, false), plate("PG-2"), 2_000);
        let newer = Ticket::open(ParkingSpot::new(3, ParkingType::Car, false), plate("PG-2"), 3_000);
        repo.save_ticket(&newer).await.unwrap();
        repo.save_ticket(&older).await.unwrap();

        let found = repo.find_latest_ticket(&plate("PG-2")).await.unwrap().unwrap();
        assert_eq!(found.id, newer.id);
        assert_eq!(found.parking_spot.number, 3);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_update_unknown_ticket_is_rejected() {
        let (repo, _guard) = connect().await;
        let ticket = Ticket::open(ParkingSpot::new(1, ParkingType::Car, false), plate("PG-3"), 0);

        assert!(matches!(
            repo.update_ticket(&ticket).await,
            Err(ParkingError::UnexpectedRowCount { actual: 0, .. })
        ));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_mark_recurring_is_idempotent() {
        let (repo, _guard) = connect().await;
        let vehicle = plate("PG-4");

        assert!(!repo.is_recurring(&vehicle).await.unwrap());
        repo.mark_recurring(&vehicle).await.unwrap();
        repo.mark_recurring(&vehicle).await.unwrap();
        assert!(repo.is_recurring(&vehicle).await.unwrap());

        repo.reset().await.unwrap();
        assert!(!repo.is_recurring(&vehicle).await.unwrap());
    }
}
