//! Domain Value Objects
//!
//! Immutable value types for the parking domain.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

use crate::error::{ParkingError, ParkingResult};

// ============================================================================
// ParkingType
// ============================================================================

/// Vehicle category a spot is built for
///
/// Numeric ids match the shell menu (`1 CAR`, `2 BIKE`); codes match the
/// `parking.parking_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum ParkingType {
    Car = 1,
    Bike = 2,
}

impl ParkingType {
    pub const ALL: [ParkingType; 2] = [ParkingType::Car, ParkingType::Bike];

    /// Menu number
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Database / configuration code
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Car => "CAR",
            Self::Bike => "BIKE",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Self::Car),
            2 => Some(Self::Bike),
            _ => None,
        }
    }

    /// Case-insensitive lookup by code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "CAR" => Some(Self::Car),
            "BIKE" => Some(Self::Bike),
            _ => None,
        }
    }

    /// Like [`ParkingType::from_code`] but reports unknown codes
    pub fn parse(code: &str) -> ParkingResult<Self> {
        Self::from_code(code).ok_or_else(|| ParkingError::UnknownParkingType(code.to_string()))
    }
}

impl fmt::Display for ParkingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// VehicleRegNumber
// ============================================================================

/// Maximum length of a registration number (in characters, after normalization)
pub const VEHICLE_REG_NUMBER_MAX_LENGTH: usize = 16;

/// Normalized vehicle registration number (plate)
///
/// # Invariants
/// - NFKC normalized, trimmed, upper-cased
/// - Non-empty, at most [`VEHICLE_REG_NUMBER_MAX_LENGTH`] characters
/// - No whitespace inside
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VehicleRegNumber(String);

impl VehicleRegNumber {
    pub fn new(input: impl AsRef<str>) -> ParkingResult<Self> {
        let normalized: String = input
            .as_ref()
            .nfkc()
            .collect::<String>()
            .trim()
            .to_uppercase();

        let reject = |reason: &str| ParkingError::InvalidVehicleRegNumber {
            input: input.as_ref().to_string(),
            reason: reason.to_string(),
        };

        if normalized.is_empty() {
            return Err(reject("must not be blank"));
        }
        if normalized.chars().count() > VEHICLE_REG_NUMBER_MAX_LENGTH {
            return Err(reject("is too long"));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(reject("must not contain whitespace"));
        }
        if normalized.contains(char::REPLACEMENT_CHARACTER) {
            return Err(reject("contains unreadable characters"));
        }
        Ok(Self(normalized))
    }

    /// Create from database value (assumes already validated)
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for VehicleRegNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VehicleRegNumber {
    type Error = ParkingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for VehicleRegNumber {
    type Error = ParkingError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VehicleRegNumber> for String {
    fn from(value: VehicleRegNumber) -> Self {
        value.0
    }
}
