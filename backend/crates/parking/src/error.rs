//! Parking Error Types
//!
//! This module provides parking-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::console::ConsoleError;
use thiserror::Error;

use crate::domain::value_objects::ParkingType;

/// Parking-specific result type alias
pub type ParkingResult<T> = Result<T, ParkingError>;

/// Parking-specific error variants
///
/// `SpotUnavailable` and `TicketNotFound` are expected outcomes the operator
/// is told about; every other [`ErrorKind`] aborts the request.
#[derive(Debug, Error)]
pub enum ParkingError {
    /// No free spot of the requested type
    #[error("No available spot for {0}")]
    SpotUnavailable(ParkingType),

    /// No open ticket for this vehicle
    #[error("No open ticket for vehicle {0}")]
    TicketNotFound(String),

    /// Exit time missing or earlier than entry time
    #[error("Invalid stay duration: in_time={in_time}, out_time={out_time:?}")]
    InvalidDuration { in_time: i64, out_time: Option<i64> },

    /// A write touched a different number of records than expected
    #[error("{operation} affected {actual} rows, expected {expected}")]
    UnexpectedRowCount {
        operation: &'static str,
        expected: u64,
        actual: u64,
    },

    /// Record store refused the operation
    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Invalid vehicle registration number '{input}': {reason}")]
    InvalidVehicleRegNumber { input: String, reason: String },

    #[error("Invalid fare policy: {0}")]
    InvalidFarePolicy(String),

    #[error("Unknown parking type: {0}")]
    UnknownParkingType(String),

    #[error("Unknown discount rule: {0}")]
    UnknownDiscountRule(String),

    /// Configuration value could not be used
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },

    /// Console input failed
    #[error("Console input error: {0}")]
    Console(#[from] ConsoleError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ParkingError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParkingError::SpotUnavailable(_) => ErrorKind::Unavailable,
            ParkingError::TicketNotFound(_) => ErrorKind::NotFound,
            ParkingError::InvalidDuration { .. } => ErrorKind::InvalidState,
            ParkingError::UnexpectedRowCount { .. }
            | ParkingError::Persistence(_)
            | ParkingError::Database(_) => ErrorKind::Persistence,
            ParkingError::InvalidVehicleRegNumber { .. }
            | ParkingError::InvalidFarePolicy(_)
            | ParkingError::UnknownParkingType(_)
            | ParkingError::UnknownDiscountRule(_)
            | ParkingError::InvalidConfig { .. }
            | ParkingError::Console(_) => ErrorKind::InvalidInput,
            ParkingError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Expected outcome the operator should simply be told about
    #[inline]
    pub fn is_user_facing(&self) -> bool {
        self.kind().is_user_facing()
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            ParkingError::Database(e) => {
                tracing::error!(error = %e, "Parking database error");
            }
            ParkingError::UnexpectedRowCount {
                operation,
                expected,
                actual,
            } => {
                tracing::error!(
                    operation = operation,
                    expected = expected,
                    actual = actual,
                    "Unexpected row count"
                );
            }
            ParkingError::Persistence(msg) => {
                tracing::error!(message = %msg, "Parking persistence failure");
            }
            ParkingError::InvalidDuration { in_time, out_time } => {
                tracing::error!(in_time = in_time, out_time = ?out_time, "Invalid stay duration");
            }
            ParkingError::Internal(msg) => {
                tracing::error!(message = %msg, "Parking internal error");
            }
            ParkingError::SpotUnavailable(parking_type) => {
                tracing::warn!(parking_type = %parking_type, "Parking slots might be full");
            }
            ParkingError::TicketNotFound(vehicle) => {
                tracing::warn!(vehicle = %vehicle, "No open ticket for vehicle");
            }
            _ => {
                tracing::debug!(error = %self, "Parking error");
            }
        }
    }
}

impl From<std::io::Error> for ParkingError {
    fn from(err: std::io::Error) -> Self {
        ParkingError::Console(ConsoleError::Io(err))
    }
}

impl From<ParkingError> for AppError {
    fn from(err: ParkingError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message).with_source(err)
    }
}
