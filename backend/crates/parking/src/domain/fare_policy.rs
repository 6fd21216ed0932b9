//! Fare Policy
//!
//! Pure pricing logic: the discount rules and the ordered chain that folds
//! them into the price of one stay.

use std::fmt;

use crate::domain::entities::Ticket;
use crate::error::{ParkingError, ParkingResult};

/// Stays up to this many minutes are free under [`DiscountRule::Free30Min`]
pub const GRACE_PERIOD_MINUTES: i64 = 30;

/// Multiplier applied to the fare of a recurring user
pub const RECURRING_USER_FACTOR: f64 = 0.95;

/// Whether a rule produces a base price or adjusts one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    /// Computes the price from duration and rate, ignoring the running price
    Primary,
    /// Adjusts the running price
    Supplementary,
}

/// One pricing rule
///
/// Codes keep the `P_` / `S_` prefixes used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountRule {
    /// Full price: `minutes * rate / 60`
    NoDiscount,
    /// First half hour free, the rest at full price
    Free30Min,
    /// 5% off for vehicles with a previous completed stay
    RecurringUsers5Percent,
}

impl DiscountRule {
    pub const ALL: [DiscountRule; 3] = [
        DiscountRule::NoDiscount,
        DiscountRule::Free30Min,
        DiscountRule::RecurringUsers5Percent,
    ];

    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoDiscount => "P_NO_DISCOUNT",
            Self::Free30Min => "P_FREE_30_MIN",
            Self::RecurringUsers5Percent => "S_RECURRING_USERS_5PERCENT",
        }
    }

    pub fn from_code(code: &str) -> ParkingResult<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|rule| rule.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ParkingError::UnknownDiscountRule(code.to_string()))
    }

    pub const fn category(&self) -> RuleCategory {
        match self {
            Self::NoDiscount | Self::Free30Min => RuleCategory::Primary,
            Self::RecurringUsers5Percent => RuleCategory::Supplementary,
        }
    }

    #[inline]
    pub const fn is_primary(&self) -> bool {
        matches!(self.category(), RuleCategory::Primary)
    }

    /// Apply this rule to the running price
    ///
    /// `duration_minutes` may be 0 for stays under a minute.
    pub fn calculate_price(
        &self,
        price: f64,
        duration_minutes: i64,
        hourly_rate: f64,
        recurring_user: bool,
    ) -> f64 {
        match self {
            Self::NoDiscount => duration_minutes as f64 * hourly_rate / 60.0,
            Self::Free30Min => {
                if duration_minutes <= GRACE_PERIOD_MINUTES {
                    0.0
                } else {
                    (duration_minutes - GRACE_PERIOD_MINUTES) as f64 * hourly_rate / 60.0
                }
            }
            Self::RecurringUsers5Percent => {
                if recurring_user {
                    price * RECURRING_USER_FACTOR
                } else {
                    price
                }
            }
        }
    }
}

impl fmt::Display for DiscountRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Ordered, immutable chain of discount rules
///
/// # Invariants
/// - The first rule is primary
/// - Every following rule is supplementary
#[derive(Debug, Clone, PartialEq)]
pub struct FarePolicy {
    rules: Vec<DiscountRule>,
}

impl FarePolicy {
    /// Build a chain anchored by `primary`
    pub fn new(
        primary: DiscountRule,
        supplementary: impl IntoIterator<Item = DiscountRule>,
    ) -> ParkingResult<Self> {
        if !primary.is_primary() {
            return Err(ParkingError::InvalidFarePolicy(format!(
                "{primary} cannot anchor a fare policy"
            )));
        }

        let mut rules = vec![primary];
        for rule in supplementary {
            if rule.is_primary() {
                return Err(ParkingError::InvalidFarePolicy(format!(
                    "{rule} is primary and cannot follow {primary}"
                )));
            }
            rules.push(rule);
        }

        Ok(Self { rules })
    }

    /// Parse a comma-separated list of rule codes, primary first
    pub fn from_codes(codes: &str) -> ParkingResult<Self> {
        let mut rules = codes
            .split(',')
            .filter(|code| !code.trim().is_empty())
            .map(DiscountRule::from_code);

        let primary = rules.next().ok_or_else(|| {
            ParkingError::InvalidFarePolicy("at least one primary rule is required".to_string())
        })??;
        let supplementary = rules.collect::<ParkingResult<Vec<_>>>()?;

        Self::new(primary, supplementary)
    }

    pub fn rules(&self) -> &[DiscountRule] {
        &self.rules
    }

    /// Rule that computes the base price (never empty after construction)
    pub fn primary(&self) -> DiscountRule {
        self.rules[0]
    }

    /// Rules applied after [`FarePolicy::primary`], in order
    pub fn supplementary(&self) -> &[DiscountRule] {
        &self.rules[1..]
    }

    /// Fold the chain over one stay
    ///
    /// Stops as soon as a rule yields exactly zero: a stay that became free
    /// stays free.
    pub fn compute_fare(&self, duration_minutes: i64, hourly_rate: f64, recurring_user: bool) -> f64 {
        let mut price = 0.0;
        for rule in &self.rules {
            price = rule.calculate_price(price, duration_minutes, hourly_rate, recurring_user);
            if price == 0.0 {
                return 0.0;
            }
        }
        price
    }

    /// Price a closed ticket
    pub fn calculate_fare(
        &self,
        ticket: &Ticket,
        hourly_rate: f64,
        recurring_user: bool,
    ) -> ParkingResult<f64> {
        let duration_minutes = ticket.duration_minutes()?;
        Ok(self.compute_fare(duration_minutes, hourly_rate, recurring_user))
    }
}

impl fmt::Display for FarePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.rules.iter().map(DiscountRule::code).collect();
        f.write_str(&codes.join(","))
    }
}
