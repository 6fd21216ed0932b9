//! Application Configuration
//!
//! Configuration for the parking application layer.

use crate::domain::fare_policy::{DiscountRule, FarePolicy};
use crate::domain::value_objects::ParkingType;
use crate::error::{ParkingError, ParkingResult};

/// Environment variable holding the car hourly rate
pub const ENV_CAR_RATE: &str = "PARKING_CAR_RATE";
/// Environment variable holding the bike hourly rate
pub const ENV_BIKE_RATE: &str = "PARKING_BIKE_RATE";
/// Environment variable holding the discount chain (comma-separated codes, primary first)
pub const ENV_DISCOUNTS: &str = "PARKING_DISCOUNTS";

/// Parking application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingConfig {
    /// Hourly rate charged for a car
    pub car_rate_per_hour: f64,
    /// Hourly rate charged for a bike
    pub bike_rate_per_hour: f64,
    /// Rule that computes the base price
    pub primary_rule: DiscountRule,
    /// Rules applied after the primary one, in order
    pub supplementary_rules: Vec<DiscountRule>,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self {
            car_rate_per_hour: 1.5,
            bike_rate_per_hour: 1.0,
            primary_rule: DiscountRule::NoDiscount,
            supplementary_rules: vec![DiscountRule::RecurringUsers5Percent],
        }
    }
}

impl ParkingConfig {
    /// Create config for development (first half hour free)
    pub fn development() -> Self {
        Self {
            primary_rule: DiscountRule::Free30Min,
            ..Default::default()
        }
    }

    /// Load overrides from the process environment
    pub fn from_env() -> ParkingResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> ParkingResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_CAR_RATE) {
            config.car_rate_per_hour = parse_rate(ENV_CAR_RATE, &value)?;
        }
        if let Some(value) = lookup(ENV_BIKE_RATE) {
            config.bike_rate_per_hour = parse_rate(ENV_BIKE_RATE, &value)?;
        }
        if let Some(value) = lookup(ENV_DISCOUNTS) {
            let policy = FarePolicy::from_codes(&value)?;
            config.primary_rule = policy.primary();
            config.supplementary_rules = policy.supplementary().to_vec();
        }

        Ok(config)
    }

    /// Base hourly rate for a vehicle category
    pub fn hourly_rate(&self, parking_type: ParkingType) -> f64 {
        match parking_type {
            ParkingType::Car => self.car_rate_per_hour,
            ParkingType::Bike => self.bike_rate_per_hour,
        }
    }

    /// Build the validated discount chain
    pub fn fare_policy(&self) -> ParkingResult<FarePolicy> {
        FarePolicy::new(self.primary_rule, self.supplementary_rules.iter().copied())
    }
}

fn parse_rate(key: &'static str, value: &str) -> ParkingResult<f64> {
    match value.trim().parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate >= 0.0 => Ok(rate),
        _ => Err(ParkingError::InvalidConfig {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ParkingConfig::default();
        assert_eq!(config.hourly_rate(ParkingType::Car), 1.5);
        assert_eq!(config.hourly_rate(ParkingType::Bike), 1.0);
        assert_eq!(
            config.fare_policy().unwrap().rules(),
            &[DiscountRule::NoDiscount, DiscountRule::RecurringUsers5Percent]
        );
    }

    #[test]
    fn test_development_uses_grace_window() {
        let config = ParkingConfig::development();
        assert_eq!(config.primary_rule, DiscountRule::Free30Min);
        assert!(config.fare_policy().is_ok());
    }

    #[test]
    fn test_from_lookup_without_overrides() {
        let config = ParkingConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ParkingConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ParkingConfig::from_lookup(lookup_from(&[
            (ENV_CAR_RATE, "2.0"),
            (ENV_BIKE_RATE, " 0.5 "),
            (ENV_DISCOUNTS, "P_FREE_30_MIN"),
        ]))
        .unwrap();

        assert_eq!(config.car_rate_per_hour, 2.0);
        assert_eq!(config.bike_rate_per_hour, 0.5);
        assert_eq!(config.primary_rule, DiscountRule::Free30Min);
        assert!(config.supplementary_rules.is_empty());
    }

    #[test]
    fn test_rejects_bad_rate() {
        for bad in ["abc", "-1", "NaN", "inf"] {
            let result = ParkingConfig::from_lookup(lookup_from(&[(ENV_CAR_RATE, bad)]));
            assert!(
                matches!(
                    result,
                    Err(ParkingError::InvalidConfig {
                        key: ENV_CAR_RATE,
                        ..
                    })
                ),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn test_discount_chain_splits_primary_first() {
        let config = ParkingConfig::from_lookup(lookup_from(&[(
            ENV_DISCOUNTS,
            "P_NO_DISCOUNT,S_RECURRING_USERS_5PERCENT",
        )]))
        .unwrap();

        assert_eq!(config.primary_rule, DiscountRule::NoDiscount);
        assert_eq!(
            config.supplementary_rules,
            vec![DiscountRule::RecurringUsers5Percent]
        );
        assert_eq!(
            config.fare_policy().unwrap().to_string(),
            "P_NO_DISCOUNT,S_RECURRING_USERS_5PERCENT"
        );
    }

    #[test]
    fn test_rejects_bad_chain() {
        let result = ParkingConfig::from_lookup(lookup_from(&[(
            ENV_DISCOUNTS,
            "S_RECURRING_USERS_5PERCENT",
        )]));
        assert!(matches!(result, Err(ParkingError::InvalidFarePolicy(_))));
    }
}
