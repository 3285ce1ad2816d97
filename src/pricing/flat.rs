//! Hourly and point-to-point flat fee schedule.
//!
//! A base quote (hourly rental for tiers with an hourly rate, point-to-point
//! otherwise) is marked up by the estimate multiplier for taxes, tolls and
//! gratuity. Add-on services are charged after that and are not marked up.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::calculators::{bounded, non_negative, round_cents};
use super::models::{
    Breakdown, ChargeComponent, FareQuote, Schedule, ServiceWindow, TripAttributes,
    MAX_DISTANCE_MILES, MAX_HOURS,
};
use super::rates::{CancellationTier, FlatRateSchedule};

/// Base price before add-ons and markup
#[derive(Debug, Clone, PartialEq)]
pub struct FlatBase {
    pub amount: Decimal,
    pub breakdown: Breakdown,
}

/// Fee owed when a booking is cancelled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationFee {
    pub tier: CancellationTier,
    pub fee: Decimal,
    /// Fee as a percentage of the booking amount
    pub percentage: Decimal,
}

impl FlatRateSchedule {
    /// Transfer priced on distance with a minimum billable distance
    pub fn point_to_point(&self, distance_miles: Decimal, window: &ServiceWindow) -> FlatBase {
        let rate = &self.point_to_point;
        let effective_distance =
            bounded(distance_miles, MAX_DISTANCE_MILES).max(rate.minimum_distance);
        let distance_charge = effective_distance * rate.per_mile;

        let flag = |on: bool, fee: Decimal| if on { fee } else { Decimal::ZERO };
        let airport = flag(window.airport, rate.airport_pickup_fee);
        let after_hours = flag(window.after_hours, rate.after_hours_fee);
        let weekend = flag(window.weekend, rate.weekend_fee);
        let holiday = flag(window.holiday, rate.holiday_fee);

        let breakdown: Breakdown = [
            (ChargeComponent::Base, rate.base_fee),
            (ChargeComponent::Distance, distance_charge),
            (ChargeComponent::AirportFee, airport),
            (ChargeComponent::AfterHoursFee, after_hours),
            (ChargeComponent::WeekendFee, weekend),
            (ChargeComponent::HolidayFee, holiday),
        ]
        .into_iter()
        .collect();

        FlatBase {
            amount: rate.base_fee + distance_charge + airport + after_hours + weekend + holiday,
            breakdown,
        }
    }

    /// Hourly rental, or `None` when the tier has no hourly rate
    pub fn hourly(
        &self,
        tier: &str,
        hours: Decimal,
        passengers: u32,
        include_chauffeur: bool,
    ) -> Option<FlatBase> {
        let rate = self.hourly.get(tier)?;

        let effective_hours = bounded(hours, MAX_HOURS).max(rate.minimum_hours);
        let hourly_charge = effective_hours * rate.base_rate;
        let chauffeur = if include_chauffeur {
            rate.chauffeur_fee
        } else {
            Decimal::ZERO
        };
        let extra_passengers = passengers.saturating_sub(rate.max_passengers);
        let extra_passenger_fee = Decimal::from(extra_passengers) * self.extra_passenger_fee;

        let breakdown: Breakdown = [
            (ChargeComponent::HourlyRate, hourly_charge),
            (ChargeComponent::ChauffeurFee, chauffeur),
            (ChargeComponent::ExtraPassengers, extra_passenger_fee),
        ]
        .into_iter()
        .collect();

        Some(FlatBase {
            amount: hourly_charge + chauffeur + extra_passenger_fee,
            breakdown,
        })
    }

    /// Add-on services requested for a trip; only requested lines appear
    pub fn additional_services(&self, attrs: &TripAttributes) -> FlatBase {
        let fees = &self.additional_fees;
        let services = &attrs.services;
        let mut breakdown = Breakdown::new();

        if attrs.additional_stop_count > 0 {
            breakdown.insert(
                ChargeComponent::Stops,
                Decimal::from(attrs.additional_stop_count) * fees.additional_stop,
            );
        }
        if attrs.has_pets {
            breakdown.insert(ChargeComponent::Pets, fees.pets);
        }
        if services.child_seats > 0 {
            breakdown.insert(
                ChargeComponent::ChildSeats,
                Decimal::from(services.child_seats) * fees.child_seat,
            );
        }
        if services.ski_rack {
            breakdown.insert(ChargeComponent::SkiRack, fees.ski_rack);
        }
        if services.luggage_trailer {
            breakdown.insert(ChargeComponent::LuggageTrailer, fees.luggage_trailer);
        }
        if services.wine_tour {
            breakdown.insert(ChargeComponent::WineTour, fees.wine_tour);
        }
        let wait_hours = bounded(services.wait_time_hours, MAX_HOURS);
        if wait_hours > Decimal::ZERO {
            breakdown.insert(ChargeComponent::WaitTime, wait_hours * fees.wait_time_per_hour);
        }

        FlatBase {
            amount: breakdown.values().copied().sum(),
            breakdown,
        }
    }

    /// Price one trip on the flat schedule.
    ///
    /// Tiers with an hourly rate are quoted as rentals for `booked_hours`
    /// (or the trip duration); every other tier is quoted point-to-point.
    pub fn quote(&self, attrs: &TripAttributes) -> FareQuote {
        let distance = bounded(attrs.distance_miles, MAX_DISTANCE_MILES);
        let hours = attrs
            .booked_hours
            .unwrap_or(attrs.duration_minutes / dec!(60));

        let base = self
            .hourly(
                &attrs.vehicle_tier,
                hours,
                attrs.passenger_count.max(1),
                attrs.include_chauffeur,
            )
            .unwrap_or_else(|| self.point_to_point(distance, &attrs.service_window));
        let services = self.additional_services(attrs);

        let markup = base.amount * (self.estimate_multiplier - Decimal::ONE);
        let subtotal = base.amount + services.amount;
        let total = subtotal + markup;

        let mut breakdown = base.breakdown;
        breakdown.extend(services.breakdown);
        breakdown.insert(ChargeComponent::TaxesTollsGratuity, markup);
        let breakdown: Breakdown = breakdown
            .into_iter()
            .map(|(component, amount)| (component, round_cents(amount)))
            .collect();

        let per_mile_basis = if distance > Decimal::ZERO {
            distance
        } else {
            Decimal::ONE
        };

        FareQuote {
            schedule: Schedule::Flat,
            total: round_cents(total),
            subtotal: round_cents(subtotal),
            breakdown,
            price_per_mile: round_cents(total / per_mile_basis),
        }
    }

    /// Fee for cancelling `hours_until_booking` hours before pickup.
    ///
    /// The matching tier's flat fee is always owed; the reported percentage
    /// of the booking amount is capped at the tier's maximum. A zero booking
    /// owes nothing.
    pub fn cancellation_fee(
        &self,
        booking_amount: Decimal,
        hours_until_booking: Decimal,
    ) -> CancellationFee {
        let booking_amount = non_negative(booking_amount);

        let rule = self.cancellation.iter().find(|rule| match rule.max_hours_before {
            Some(limit) => hours_until_booking <= limit,
            None => true,
        });

        let Some(rule) = rule else {
            return CancellationFee {
                tier: CancellationTier::Standard,
                fee: Decimal::ZERO,
                percentage: Decimal::ZERO,
            };
        };

        if booking_amount.is_zero() {
            return CancellationFee {
                tier: rule.tier,
                fee: Decimal::ZERO,
                percentage: Decimal::ZERO,
            };
        }

        // Bookings of a fraction of a cent overflow the ratio; report the cap
        let percentage = rule
            .fee
            .checked_div(booking_amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(rule.max_percentage, |pct| pct.min(rule.max_percentage));

        CancellationFee {
            tier: rule.tier,
            fee: round_cents(rule.fee),
            percentage: round_cents(percentage),
        }
    }
}
