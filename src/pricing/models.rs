//! Fare engine input and output values.
//!
//! These are plain values: a quote request is built per call and a
//! `FareQuote` is never mutated after the engine returns it.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Rate schedule used to price a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Schedule {
    /// Per-mile/per-minute schedule with surcharges, multipliers and caps
    #[default]
    Competitive,
    /// Hourly rental or point-to-point flat fees plus add-on services
    Flat,
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Competitive => write!(f, "competitive"),
            Schedule::Flat => write!(f, "flat"),
        }
    }
}

/// Flat surcharge windows for point-to-point trips.
///
/// Derived by the caller (see [`crate::pricing::calendar`]); the engine only
/// reads the flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceWindow {
    pub airport: bool,
    pub after_hours: bool,
    pub weekend: bool,
    pub holiday: bool,
}

/// Optional add-ons priced by the flat schedule after the base quote
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalServices {
    pub child_seats: u32,
    pub ski_rack: bool,
    pub luggage_trailer: bool,
    pub wine_tour: bool,
    pub wait_time_hours: Decimal,
}

/// Everything the engine needs to know about one trip.
///
/// Distance and duration come from the mapping service; zero means the
/// lookup did not produce a value and is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripAttributes {
    pub distance_miles: Decimal,
    #[serde(default)]
    pub duration_minutes: Decimal,
    #[serde(default = "default_passengers")]
    pub passenger_count: u32,
    #[serde(default)]
    pub has_pets: bool,
    #[serde(default)]
    pub additional_stop_count: u32,
    #[serde(default)]
    pub is_peak_hour: bool,
    #[serde(default = "default_vehicle_tier")]
    pub vehicle_tier: String,
    #[serde(default)]
    pub service_window: ServiceWindow,
    #[serde(default)]
    pub services: AdditionalServices,
    /// Hours booked for an hourly rental; falls back to the trip duration
    #[serde(default)]
    pub booked_hours: Option<Decimal>,
    #[serde(default = "default_include_chauffeur")]
    pub include_chauffeur: bool,
}

fn default_passengers() -> u32 {
    1
}

fn default_vehicle_tier() -> String {
    DEFAULT_VEHICLE_TIER.to_string()
}

fn default_include_chauffeur() -> bool {
    true
}

/// Largest trip distance the engines price; longer distances are clamped
pub const MAX_DISTANCE_MILES: Decimal = dec!(10000);

/// Largest trip duration the engines price (30 days)
pub const MAX_DURATION_MINUTES: Decimal = dec!(43200);

/// Largest rental or wait time, in hours (30 days)
pub const MAX_HOURS: Decimal = dec!(720);

/// Tier quoted when the booking form does not send one (luxury SUV)
pub const DEFAULT_VEHICLE_TIER: &str = "premium";

impl TripAttributes {
    /// A single-passenger trip in the default tier with no extras
    pub fn new(distance_miles: Decimal, duration_minutes: Decimal) -> Self {
        Self {
            distance_miles,
            duration_minutes,
            passenger_count: default_passengers(),
            has_pets: false,
            additional_stop_count: 0,
            is_peak_hour: false,
            vehicle_tier: default_vehicle_tier(),
            service_window: ServiceWindow::default(),
            services: AdditionalServices::default(),
            booked_hours: None,
            include_chauffeur: true,
        }
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.vehicle_tier = tier.into();
        self
    }

    pub fn with_passengers(mut self, count: u32) -> Self {
        self.passenger_count = count;
        self
    }

    pub fn with_pets(mut self, has_pets: bool) -> Self {
        self.has_pets = has_pets;
        self
    }

    pub fn with_stops(mut self, count: u32) -> Self {
        self.additional_stop_count = count;
        self
    }

    pub fn with_peak_hour(mut self, is_peak_hour: bool) -> Self {
        self.is_peak_hour = is_peak_hour;
        self
    }

    pub fn with_window(mut self, window: ServiceWindow) -> Self {
        self.service_window = window;
        self
    }

    pub fn with_services(mut self, services: AdditionalServices) -> Self {
        self.services = services;
        self
    }

    pub fn with_booked_hours(mut self, hours: Decimal) -> Self {
        self.booked_hours = Some(hours);
        self
    }
}

/// Named line of a fare breakdown.
///
/// Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChargeComponent {
    Base,
    Distance,
    Time,
    HourlyRate,
    ChauffeurFee,
    ExtraPassengers,
    Passengers,
    AirportFee,
    AfterHoursFee,
    WeekendFee,
    HolidayFee,
    Pets,
    Stops,
    ChildSeats,
    SkiRack,
    LuggageTrailer,
    WineTour,
    WaitTime,
    PeakHour,
    VehiclePremium,
    ServiceFee,
    BookingFee,
    TaxesTollsGratuity,
}

/// Itemized charges, ordered for display
pub type Breakdown = BTreeMap<ChargeComponent, Decimal>;

/// One computed fare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuote {
    pub schedule: Schedule,
    pub total: Decimal,
    pub subtotal: Decimal,
    pub breakdown: Breakdown,
    pub price_per_mile: Decimal,
}

impl FareQuote {
    /// Amount for one breakdown line, zero when the line is absent
    pub fn component(&self, component: ChargeComponent) -> Decimal {
        self.breakdown
            .get(&component)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
