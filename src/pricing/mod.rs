//! Fare pricing engine.
//!
//! Two rate schedules behind one [`PricingStrategy`] contract:
//! the competitive per-mile/per-minute schedule and the flat
//! hourly/point-to-point schedule. Called by the booking page via HTTP/JSON.

pub mod calculators;
pub mod calendar;
pub mod competitive;
pub mod flat;
pub mod models;
pub mod rates;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod strategy;

// Re-export commonly used items
pub use calculators::{format_usd, round_money};
pub use competitive::{compare_to_benchmark, estimate, quote, BenchmarkComparison, EstimateOptions};
pub use models::{ChargeComponent, FareQuote, Schedule, TripAttributes};
pub use rates::{FlatRateSchedule, RateBook, RateConfig};
pub use routes::router;
pub use services::{PricingError, PricingService};
pub use strategy::PricingStrategy;
