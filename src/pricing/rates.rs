//! Rate tables for both fare schedules.
//!
//! Rates live in a versioned JSON document (`config/rates.json`) so operators
//! can retune pricing without a code change. The built-in table is the same
//! file embedded at compile time.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::services::PricingError;

/// Rate table layout understood by this build
pub const RATE_TABLE_VERSION: u32 = 1;

const BUILTIN_RATES: &str = include_str!("../../config/rates.json");

/// Competitive per-mile/per-minute schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateConfig {
    pub base_fare: Decimal,
    pub per_mile_rate: Decimal,
    pub per_minute_rate: Decimal,
    pub minimum_fare: Decimal,
    /// Passenger count -> flat surcharge
    pub passenger_surcharge: BTreeMap<u32, Decimal>,
    pub pet_fee: Decimal,
    pub additional_stop_fee: Decimal,
    pub peak_hour_multiplier: Decimal,
    pub service_fee_percentage: Decimal,
    pub booking_fee: Decimal,
    /// Vehicle tier -> price multiplier
    pub vehicle_type_multiplier: BTreeMap<String, Decimal>,
    pub maximum_price_per_mile: Decimal,
    pub maximum_fare_multiplier: Decimal,
}

impl RateConfig {
    /// Surcharge for a party size.
    ///
    /// Uses the largest table entry not above `count`, so parties bigger than
    /// the table pay the top tier's surcharge. Counts below every entry pay
    /// nothing.
    pub fn passenger_surcharge_for(&self, count: u32) -> Decimal {
        self.passenger_surcharge
            .range(..=count)
            .next_back()
            .map(|(_, surcharge)| *surcharge)
            .unwrap_or(Decimal::ZERO)
    }

    /// Multiplier for a vehicle tier, 1.0 for tiers not in the table
    pub fn vehicle_multiplier(&self, tier: &str) -> Decimal {
        self.vehicle_type_multiplier
            .get(tier)
            .copied()
            .unwrap_or(Decimal::ONE)
    }

    fn validate(&self, errors: &mut Vec<String>) {
        let amounts = [
            ("competitive.baseFare", self.base_fare),
            ("competitive.perMileRate", self.per_mile_rate),
            ("competitive.perMinuteRate", self.per_minute_rate),
            ("competitive.minimumFare", self.minimum_fare),
            ("competitive.petFee", self.pet_fee),
            ("competitive.additionalStopFee", self.additional_stop_fee),
            ("competitive.serviceFeePercentage", self.service_fee_percentage),
            ("competitive.bookingFee", self.booking_fee),
            ("competitive.maximumPricePerMile", self.maximum_price_per_mile),
            ("competitive.maximumFareMultiplier", self.maximum_fare_multiplier),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                errors.push(format!("{} must not be negative", field));
            }
        }

        if self.peak_hour_multiplier < Decimal::ONE {
            errors.push("competitive.peakHourMultiplier must be at least 1".to_string());
        }

        for (count, surcharge) in &self.passenger_surcharge {
            if *surcharge < Decimal::ZERO {
                errors.push(format!(
                    "competitive.passengerSurcharge.{} must not be negative",
                    count
                ));
            }
        }

        for (tier, multiplier) in &self.vehicle_type_multiplier {
            if *multiplier < Decimal::ZERO {
                errors.push(format!(
                    "competitive.vehicleTypeMultiplier.{} must not be negative",
                    tier
                ));
            }
        }
    }
}

/// Hourly rental terms for one vehicle tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyRate {
    pub base_rate: Decimal,
    pub minimum_hours: Decimal,
    pub chauffeur_fee: Decimal,
    pub max_passengers: u32,
    #[serde(default)]
    pub max_luggage: u32,
    #[serde(default)]
    pub description: String,
}

/// Point-to-point transfer terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointToPointRate {
    pub base_fee: Decimal,
    pub per_mile: Decimal,
    pub minimum_distance: Decimal,
    pub airport_pickup_fee: Decimal,
    /// 10pm - 6am
    pub after_hours_fee: Decimal,
    /// Friday 5pm - Monday 6am
    pub weekend_fee: Decimal,
    pub holiday_fee: Decimal,
}

/// Add-on fees charged on top of a flat quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalFees {
    pub additional_stop: Decimal,
    pub pets: Decimal,
    pub child_seat: Decimal,
    pub ski_rack: Decimal,
    pub luggage_trailer: Decimal,
    pub wine_tour: Decimal,
    pub wait_time_per_hour: Decimal,
}

/// Cancellation notice tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CancellationTier {
    NoShow,
    LateNotice,
    Standard,
}

/// Flat cancellation fee, capped at a percentage of the booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationRule {
    pub tier: CancellationTier,
    /// Applies when cancelling at most this many hours before pickup;
    /// `None` matches any notice period
    #[serde(default)]
    pub max_hours_before: Option<Decimal>,
    pub fee: Decimal,
    pub max_percentage: Decimal,
}

/// Hourly/point-to-point schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRateSchedule {
    pub hourly: BTreeMap<String, HourlyRate>,
    pub point_to_point: PointToPointRate,
    pub additional_fees: AdditionalFees,
    pub extra_passenger_fee: Decimal,
    /// Folds taxes, tolls and gratuity into the estimated total
    pub estimate_multiplier: Decimal,
    /// Checked in order; the first matching rule wins
    pub cancellation: Vec<CancellationRule>,
}

impl FlatRateSchedule {
    fn validate(&self, errors: &mut Vec<String>) {
        if self.estimate_multiplier < Decimal::ONE {
            errors.push("flat.estimateMultiplier must be at least 1".to_string());
        }
        if self.extra_passenger_fee < Decimal::ZERO {
            errors.push("flat.extraPassengerFee must not be negative".to_string());
        }
        for (tier, rate) in &self.hourly {
            if rate.base_rate < Decimal::ZERO
                || rate.minimum_hours < Decimal::ZERO
                || rate.chauffeur_fee < Decimal::ZERO
            {
                errors.push(format!("flat.hourly.{} has a negative rate", tier));
            }
        }
        let p2p = &self.point_to_point;
        if [
            p2p.base_fee,
            p2p.per_mile,
            p2p.minimum_distance,
            p2p.airport_pickup_fee,
            p2p.after_hours_fee,
            p2p.weekend_fee,
            p2p.holiday_fee,
        ]
        .iter()
        .any(|v| *v < Decimal::ZERO)
        {
            errors.push("flat.pointToPoint has a negative rate".to_string());
        }
        if self.cancellation.is_empty() {
            errors.push("flat.cancellation needs at least one rule".to_string());
        }
        if let Some(last) = self.cancellation.last() {
            if last.max_hours_before.is_some() {
                errors.push("flat.cancellation last rule must not set maxHoursBefore".to_string());
            }
        }
        for rule in &self.cancellation {
            if rule.max_percentage < Decimal::ZERO || rule.max_percentage > dec!(100) {
                errors.push(format!(
                    "flat.cancellation.{:?} maxPercentage must be between 0 and 100",
                    rule.tier
                ));
            }
        }
    }
}

/// Every rate schedule, as loaded from one rate table document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBook {
    pub version: u32,
    pub competitive: RateConfig,
    pub flat: FlatRateSchedule,
}

impl RateBook {
    /// Rate table compiled into the binary
    pub fn builtin() -> Result<Self, PricingError> {
        Self::from_json(BUILTIN_RATES)
    }

    /// Load and validate a rate table from disk
    pub fn load(path: &Path) -> Result<Self, PricingError> {
        let raw = std::fs::read_to_string(path).map_err(|e| PricingError::RateTableUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate a rate table document
    pub fn from_json(raw: &str) -> Result<Self, PricingError> {
        let book: RateBook = serde_json::from_str(raw)?;
        book.validate()?;
        Ok(book)
    }

    fn validate(&self) -> Result<(), PricingError> {
        if self.version != RATE_TABLE_VERSION {
            return Err(PricingError::UnsupportedVersion {
                found: self.version,
                expected: RATE_TABLE_VERSION,
            });
        }

        let mut errors = Vec::new();
        self.competitive.validate(&mut errors);
        self.flat.validate(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PricingError::InvalidRateTable { errors })
        }
    }
}

/// Competitor rates used only for the savings comparison shown to riders.
///
/// Not part of the rate table; reloading [`RateConfig`] leaves these fixed.
pub mod benchmark {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    pub const BASE_FARE: Decimal = dec!(8.50);
    pub const PER_MILE: Decimal = dec!(3.75);
    pub const PER_MINUTE: Decimal = dec!(0.65);
    pub const BOOKING_FEE: Decimal = dec!(2.80);
    /// Percent of subtotal
    pub const SERVICE_FEE_PERCENTAGE: Decimal = dec!(15);
    pub const MINIMUM_FARE: Decimal = dec!(25);
}
