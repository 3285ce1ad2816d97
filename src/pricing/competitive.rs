//! Competitive per-mile/per-minute fare schedule.
//!
//! Priced to sit alongside app-based black car services: a base fare plus
//! distance and time, flat surcharges, peak and vehicle multipliers, and two
//! safety caps that keep pathological trips from producing absurd quotes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::calculators::{bounded, round_cents, round_money};
use super::models::{
    Breakdown, ChargeComponent, FareQuote, Schedule, TripAttributes, MAX_DISTANCE_MILES,
    MAX_DURATION_MINUTES,
};
use super::rates::{benchmark, RateConfig};

/// Minutes per mile assumed when the distance lookup returns no duration
pub const AVERAGE_MINUTES_PER_MILE: Decimal = dec!(2.5);

/// Price one trip on the competitive schedule.
///
/// Never fails: unknown tiers price at a unit multiplier, party sizes outside
/// the surcharge table fall back to the nearest lower entry, negative
/// distance or duration is treated as zero, and values above
/// [`MAX_DISTANCE_MILES`] / [`MAX_DURATION_MINUTES`] are clamped.
pub fn quote(attrs: &TripAttributes, config: &RateConfig) -> FareQuote {
    let distance = bounded(attrs.distance_miles, MAX_DISTANCE_MILES);
    let duration = bounded(attrs.duration_minutes, MAX_DURATION_MINUTES);
    let passengers = attrs.passenger_count.max(1);

    // Raw components
    let distance_charge = distance * config.per_mile_rate;
    let time_charge = duration * config.per_minute_rate;
    let passenger_surcharge = config.passenger_surcharge_for(passengers);
    let pet_fee = if attrs.has_pets {
        config.pet_fee
    } else {
        Decimal::ZERO
    };
    let stops_fee = Decimal::from(attrs.additional_stop_count) * config.additional_stop_fee;

    let mut subtotal = config.base_fare
        + distance_charge
        + time_charge
        + passenger_surcharge
        + pet_fee
        + stops_fee;

    if attrs.is_peak_hour {
        subtotal *= config.peak_hour_multiplier;
    }

    let vehicle_multiplier = config.vehicle_multiplier(&attrs.vehicle_tier);
    subtotal *= vehicle_multiplier;

    let floor = minimum_fare_for(config, vehicle_multiplier);
    subtotal = subtotal.max(floor);

    // Cap 1: per-mile ceiling, meaningless without a distance
    if distance > Decimal::ZERO && subtotal / distance > config.maximum_price_per_mile {
        subtotal = config.maximum_price_per_mile * distance;
    }

    // Cap 2: ceiling relative to the pre-surcharge, pre-multiplier fare
    let base_calculation = config.base_fare + distance_charge + time_charge;
    let maximum_allowed = base_calculation * config.maximum_fare_multiplier;
    if subtotal > maximum_allowed {
        subtotal = maximum_allowed;
    }

    // Caps bound outliers; they never take a fare below the minimum
    subtotal = subtotal.max(floor);

    let service_fee = subtotal * config.service_fee_percentage / Decimal::ONE_HUNDRED;
    let booking_fee = config.booking_fee;
    let total = subtotal + service_fee + booking_fee;

    let peak_delta = if attrs.is_peak_hour {
        subtotal * (config.peak_hour_multiplier - Decimal::ONE)
    } else {
        Decimal::ZERO
    };
    let vehicle_delta = subtotal * (vehicle_multiplier - Decimal::ONE);

    let breakdown: Breakdown = [
        (ChargeComponent::Base, config.base_fare),
        (ChargeComponent::Distance, distance_charge),
        (ChargeComponent::Time, time_charge),
        (ChargeComponent::Passengers, passenger_surcharge),
        (ChargeComponent::Pets, pet_fee),
        (ChargeComponent::Stops, stops_fee),
        (ChargeComponent::PeakHour, peak_delta),
        (ChargeComponent::VehiclePremium, vehicle_delta),
        (ChargeComponent::ServiceFee, service_fee),
        (ChargeComponent::BookingFee, booking_fee),
    ]
    .into_iter()
    .map(|(component, amount)| (component, round_cents(amount)))
    .collect();

    let per_mile_basis = if distance > Decimal::ZERO {
        distance
    } else {
        Decimal::ONE
    };

    FareQuote {
        schedule: Schedule::Competitive,
        total: round_cents(total),
        subtotal: round_cents(subtotal),
        breakdown,
        price_per_mile: round_cents(total / per_mile_basis),
    }
}

/// Minimum subtotal for a tier.
///
/// The configured minimum is a standard-tier price; premium tiers scale it by
/// their multiplier, discounted tiers keep the configured minimum.
pub fn minimum_fare_for(config: &RateConfig, vehicle_multiplier: Decimal) -> Decimal {
    config.minimum_fare * vehicle_multiplier.max(Decimal::ONE)
}

/// Trip options for a quick estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimateOptions {
    pub passengers: u32,
    pub has_pets: bool,
    pub additional_stops: u32,
    pub is_peak_hour: bool,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        Self {
            passengers: 1,
            has_pets: false,
            additional_stops: 0,
            is_peak_hour: false,
        }
    }
}

/// Total for a trip in the default tier.
///
/// A missing or zero duration is estimated from the distance.
pub fn estimate(
    distance_miles: Decimal,
    duration_minutes: Option<Decimal>,
    options: &EstimateOptions,
    config: &RateConfig,
) -> Decimal {
    let distance = bounded(distance_miles, MAX_DISTANCE_MILES);
    let duration = match duration_minutes {
        Some(minutes) if minutes > Decimal::ZERO => minutes.min(MAX_DURATION_MINUTES),
        _ => distance * AVERAGE_MINUTES_PER_MILE,
    };

    let attrs = TripAttributes::new(distance, duration)
        .with_passengers(options.passengers)
        .with_pets(options.has_pets)
        .with_stops(options.additional_stops)
        .with_peak_hour(options.is_peak_hour);

    quote(&attrs, config).total
}

/// Our estimate next to a typical app-based black car fare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub benchmark_total: Decimal,
    pub own_total: Decimal,
    /// Positive when we are cheaper
    pub savings: Decimal,
    /// Savings as a percentage of the benchmark, one decimal place
    pub savings_percent: Decimal,
}

/// Compare our estimate against the competitor benchmark rates
pub fn compare_to_benchmark(
    distance_miles: Decimal,
    duration_minutes: Option<Decimal>,
    config: &RateConfig,
) -> BenchmarkComparison {
    let distance = bounded(distance_miles, MAX_DISTANCE_MILES);
    let duration = match duration_minutes {
        Some(minutes) if minutes > Decimal::ZERO => minutes.min(MAX_DURATION_MINUTES),
        _ => distance * AVERAGE_MINUTES_PER_MILE,
    };

    let benchmark_subtotal = (benchmark::BASE_FARE
        + distance * benchmark::PER_MILE
        + duration * benchmark::PER_MINUTE)
        .max(benchmark::MINIMUM_FARE);
    let benchmark_service =
        benchmark_subtotal * benchmark::SERVICE_FEE_PERCENTAGE / Decimal::ONE_HUNDRED;
    let benchmark_total = benchmark_subtotal + benchmark_service + benchmark::BOOKING_FEE;

    let own_total = estimate(
        distance,
        Some(duration),
        &EstimateOptions::default(),
        config,
    );

    // benchmark_total is at least the benchmark minimum, never zero
    let savings_percent =
        (Decimal::ONE - own_total / benchmark_total) * Decimal::ONE_HUNDRED;

    BenchmarkComparison {
        benchmark_total: round_cents(benchmark_total),
        own_total: round_cents(own_total),
        savings: round_cents(benchmark_total - own_total),
        savings_percent: round_money(savings_percent, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::rates::RateBook;

    fn rates() -> RateConfig {
        RateBook::builtin().unwrap().competitive
    }

    fn scenario_a() -> TripAttributes {
        TripAttributes::new(dec!(10), dec!(25)).with_tier("premium")
    }

    // ==================== reference scenarios ====================

    #[test]
    fn test_scenario_a_premium_ten_miles() {
        let quote = quote(&scenario_a(), &rates());

        assert_eq!(quote.schedule, Schedule::Competitive);
        assert_eq!(quote.subtotal, dec!(68.90));
        assert_eq!(quote.component(ChargeComponent::Base), dec!(8.00));
        assert_eq!(quote.component(ChargeComponent::Distance), dec!(32.50));
        assert_eq!(quote.component(ChargeComponent::Time), dec!(12.50));
        assert_eq!(quote.component(ChargeComponent::ServiceFee), dec!(5.51));
        assert_eq!(quote.component(ChargeComponent::BookingFee), dec!(2.50));
        assert_eq!(quote.component(ChargeComponent::VehiclePremium), dec!(20.67));
        assert_eq!(quote.component(ChargeComponent::PeakHour), dec!(0));
        assert_eq!(quote.total, dec!(76.91));
        assert_eq!(quote.price_per_mile, dec!(7.69));
    }

    #[test]
    fn test_scenario_b_zero_distance_hits_tier_minimum() {
        let attrs = TripAttributes::new(dec!(0), dec!(0)).with_tier("premium");
        let quote = quote(&attrs, &rates());

        assert_eq!(quote.subtotal, dec!(32.50));
        assert_eq!(quote.component(ChargeComponent::ServiceFee), dec!(2.60));
        assert_eq!(quote.total, dec!(37.60));
        // Distance treated as one mile for the per-mile figure
        assert_eq!(quote.price_per_mile, dec!(37.60));
    }

    #[test]
    fn test_scenario_c_passenger_surcharge() {
        let attrs = scenario_a().with_passengers(3);
        let quote = quote(&attrs, &rates());

        assert_eq!(quote.component(ChargeComponent::Passengers), dec!(6.00));
        // 59 * 1.3 = 76.70 exceeds $7/mile over 10 miles
        assert_eq!(quote.subtotal, dec!(70.00));
        assert_eq!(quote.total, dec!(78.10));
    }

    #[test]
    fn test_scenario_d_unknown_tier_uses_unit_multiplier() {
        let attrs = scenario_a().with_tier("economy");
        let quote = quote(&attrs, &rates());

        assert_eq!(quote.subtotal, dec!(53.00));
        assert_eq!(quote.component(ChargeComponent::VehiclePremium), dec!(0));
        assert_eq!(quote.component(ChargeComponent::ServiceFee), dec!(4.24));
        assert_eq!(quote.total, dec!(59.74));
    }

    #[test]
    fn test_scenario_e_pets_and_stops_itemized() {
        let attrs = scenario_a().with_pets(true).with_stops(2);
        let quote = quote(&attrs, &rates());

        assert_eq!(quote.component(ChargeComponent::Pets), dec!(10.00));
        assert_eq!(quote.component(ChargeComponent::Stops), dec!(16.00));
        assert!(quote.breakdown.contains_key(&ChargeComponent::Pets));
        assert!(quote.breakdown.contains_key(&ChargeComponent::Stops));
    }

    // ==================== multipliers ====================

    #[test]
    fn test_peak_hour_breakdown_uses_final_subtotal() {
        let attrs = scenario_a().with_peak_hour(true);
        let quote = quote(&attrs, &rates());

        // 53 * 1.15 * 1.3 = 79.235, capped at $7/mile
        assert_eq!(quote.subtotal, dec!(70.00));
        assert_eq!(quote.component(ChargeComponent::PeakHour), dec!(10.50));
        assert_eq!(quote.component(ChargeComponent::VehiclePremium), dec!(21.00));
    }

    #[test]
    fn test_peak_hour_never_cheaper() {
        let rates = rates();
        let off_peak = quote(&TripAttributes::new(dec!(4), dec!(15)), &rates);
        let peak = quote(&TripAttributes::new(dec!(4), dec!(15)).with_peak_hour(true), &rates);
        assert!(peak.total >= off_peak.total);
    }

    #[test]
    fn test_standard_tier_minimum_is_configured_minimum() {
        let attrs = TripAttributes::new(dec!(0), dec!(0)).with_tier("standard");
        let quote = quote(&attrs, &rates());
        assert_eq!(quote.subtotal, dec!(25.00));
        assert_eq!(quote.total, dec!(29.50));
    }

    // ==================== safety caps ====================

    #[test]
    fn test_per_mile_cap_grows_linearly() {
        let rates = rates();
        let trip = |miles: Decimal| {
            TripAttributes::new(miles, miles * AVERAGE_MINUTES_PER_MILE)
                .with_tier("executive")
                .with_peak_hour(true)
        };

        let at_100 = quote(&trip(dec!(100)), &rates);
        let at_101 = quote(&trip(dec!(101)), &rates);

        assert_eq!(at_100.subtotal, dec!(700.00));
        assert_eq!(at_101.subtotal, dec!(707.00));
        assert_eq!(at_100.total, dec!(758.50));
        assert_eq!(at_101.total - at_100.total, dec!(7.56));
    }

    #[test]
    fn test_multiplier_cap_applies_after_per_mile_cap() {
        let attrs = TripAttributes::new(dec!(40), dec!(0))
            .with_tier("executive")
            .with_peak_hour(true)
            .with_passengers(6)
            .with_pets(true)
            .with_stops(5);
        let quote = quote(&attrs, &rates());

        // Per-mile cap gives 280, then 2 x (8 + 130) = 276 tightens it
        assert_eq!(quote.subtotal, dec!(276.00));
        assert_eq!(quote.component(ChargeComponent::ServiceFee), dec!(22.08));
        assert_eq!(quote.total, dec!(300.58));
    }

    #[test]
    fn test_caps_never_undercut_minimum() {
        // One mile: per-mile cap would give $7
        let attrs = TripAttributes::new(dec!(1), dec!(2)).with_tier("standard");
        let quote = quote(&attrs, &rates());
        assert_eq!(quote.subtotal, dec!(25.00));
    }

    // ==================== out-of-range inputs ====================

    #[test]
    fn test_negative_inputs_clamped_to_zero() {
        let rates = rates();
        let negative = quote(&TripAttributes::new(dec!(-5), dec!(-30)), &rates);
        let zero = quote(&TripAttributes::new(dec!(0), dec!(0)), &rates);
        assert_eq!(negative, zero);
        assert_eq!(negative.component(ChargeComponent::Distance), dec!(0));
    }

    #[test]
    fn test_oversized_inputs_clamped_to_limits() {
        let rates = rates();
        let huge = TripAttributes::new(Decimal::MAX, Decimal::MAX);
        let at_limit = TripAttributes::new(MAX_DISTANCE_MILES, MAX_DURATION_MINUTES);

        let quote_huge = quote(&huge, &rates);
        assert_eq!(quote_huge, quote(&at_limit, &rates));
        assert_eq!(quote_huge.component(ChargeComponent::Distance), dec!(32500.00));
        // Per-mile cap binds at the limit
        assert_eq!(quote_huge.subtotal, dec!(70000.00));

        let estimated = estimate(
            Decimal::MAX,
            Some(Decimal::MAX),
            &EstimateOptions::default(),
            &rates,
        );
        assert_eq!(estimated, quote_huge.total);

        let comparison = compare_to_benchmark(Decimal::MAX, Some(Decimal::MAX), &rates);
        assert!(comparison.own_total > Decimal::ZERO);
    }

    #[test]
    fn test_zero_passengers_treated_as_one() {
        let rates = rates();
        let none = quote(&scenario_a().with_passengers(0), &rates);
        let one = quote(&scenario_a().with_passengers(1), &rates);
        assert_eq!(none, one);
    }

    #[test]
    fn test_oversized_party_pays_top_surcharge() {
        let quote = quote(&scenario_a().with_passengers(8), &rates());
        assert_eq!(quote.component(ChargeComponent::Passengers), dec!(15.00));
    }

    #[test]
    fn test_quote_is_repeatable() {
        let rates = rates();
        let attrs = scenario_a().with_pets(true).with_peak_hour(true);
        assert_eq!(quote(&attrs, &rates), quote(&attrs, &rates));
    }

    // ==================== estimate / benchmark ====================

    #[test]
    fn test_estimate_derives_duration() {
        let rates = rates();
        let options = EstimateOptions::default();
        assert_eq!(estimate(dec!(10), None, &options, &rates), dec!(76.91));
        assert_eq!(estimate(dec!(10), Some(dec!(0)), &options, &rates), dec!(76.91));
        assert_eq!(estimate(dec!(10), Some(dec!(25)), &options, &rates), dec!(76.91));
    }

    #[test]
    fn test_estimate_honours_options() {
        let rates = rates();
        let options = EstimateOptions {
            passengers: 3,
            ..EstimateOptions::default()
        };
        assert_eq!(estimate(dec!(10), None, &options, &rates), dec!(78.10));
    }

    #[test]
    fn test_compare_to_benchmark() {
        let comparison = compare_to_benchmark(dec!(10), None, &rates());

        // 8.50 + 37.50 + 16.25 = 62.25, +15% service, +2.80 booking
        assert_eq!(comparison.benchmark_total, dec!(74.39));
        assert_eq!(comparison.own_total, dec!(76.91));
        assert_eq!(comparison.savings, dec!(-2.52));
        assert_eq!(comparison.savings_percent, dec!(-3.4));
    }

    #[test]
    fn test_benchmark_applies_its_own_minimum() {
        let comparison = compare_to_benchmark(dec!(0), None, &rates());
        // 25 minimum, +3.75 service, +2.80 booking
        assert_eq!(comparison.benchmark_total, dec!(31.55));
        assert_eq!(comparison.own_total, dec!(37.60));
    }
}
