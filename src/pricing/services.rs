//! Pricing service: the active rate table plus quote bookkeeping.
//!
//! The engine functions are pure; this layer owns the one piece of shared
//! state (the currently loaded rate table), stamps quotes with an id and logs.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::calculators::format_usd;
use super::competitive::{self, BenchmarkComparison, EstimateOptions};
use super::flat::CancellationFee;
use super::models::{FareQuote, Schedule, TripAttributes};
use super::rates::RateBook;

/// Rate table loading errors
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Rate table could not be read from {path}: {message}")]
    RateTableUnreadable { path: String, message: String },

    #[error("Rate table is not valid JSON: {0}")]
    MalformedRateTable(#[from] serde_json::Error),

    #[error("Rate table version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Rate table failed validation: {}", .errors.join("; "))]
    InvalidRateTable { errors: Vec<String> },
}

/// A quote handed out to a caller
#[derive(Debug, Clone)]
pub struct IssuedQuote {
    pub quote_id: String,
    pub quote: FareQuote,
    pub display_total: String,
}

/// Prices trips against the currently loaded rate table
#[derive(Clone)]
pub struct PricingService {
    rates: Arc<RwLock<Arc<RateBook>>>,
    source: Option<PathBuf>,
}

impl PricingService {
    pub fn new(book: RateBook, source: Option<PathBuf>) -> Self {
        Self {
            rates: Arc::new(RwLock::new(Arc::new(book))),
            source,
        }
    }

    /// Load rates from `source`, or the built-in table when none is set
    pub fn from_source(source: Option<PathBuf>) -> Result<Self, PricingError> {
        let book = match &source {
            Some(path) => RateBook::load(path)?,
            None => RateBook::builtin()?,
        };
        info!(
            version = book.version,
            source = %source.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "builtin".to_string()),
            "Rate table loaded"
        );
        Ok(Self::new(book, source))
    }

    /// Snapshot of the active rate table
    pub fn rates(&self) -> Arc<RateBook> {
        let guard = self
            .rates
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    /// Re-read the rate table from its source.
    ///
    /// The active table is only replaced when the new one loads and
    /// validates; quotes in flight keep the snapshot they started with.
    pub fn reload(&self) -> Result<Arc<RateBook>, PricingError> {
        let book = match &self.source {
            Some(path) => RateBook::load(path),
            None => RateBook::builtin(),
        };

        let book = match book {
            Ok(book) => Arc::new(book),
            Err(e) => {
                warn!("Rate table reload failed, keeping current table: {}", e);
                return Err(e);
            }
        };

        let mut guard = self
            .rates
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::clone(&book);
        info!(version = book.version, "Rate table reloaded");
        Ok(book)
    }

    /// Price a trip on the selected schedule and stamp it with an id
    #[tracing::instrument(skip(self, attrs), fields(tier = %attrs.vehicle_tier))]
    pub fn quote(&self, schedule: Schedule, attrs: &TripAttributes) -> IssuedQuote {
        let rates = self.rates();
        let quote = rates.strategy(schedule).quote(attrs);
        let quote_id = generate_quote_id(Utc::now());

        debug!(
            quote_id = %quote_id,
            total = %quote.total,
            subtotal = %quote.subtotal,
            "Quote issued"
        );

        IssuedQuote {
            display_total: format_usd(quote.total),
            quote_id,
            quote,
        }
    }

    #[tracing::instrument(skip(self, options))]
    pub fn estimate(
        &self,
        distance_miles: Decimal,
        duration_minutes: Option<Decimal>,
        options: &EstimateOptions,
    ) -> Decimal {
        competitive::estimate(
            distance_miles,
            duration_minutes,
            options,
            &self.rates().competitive,
        )
    }

    #[tracing::instrument(skip(self))]
    pub fn compare_to_benchmark(
        &self,
        distance_miles: Decimal,
        duration_minutes: Option<Decimal>,
    ) -> BenchmarkComparison {
        competitive::compare_to_benchmark(
            distance_miles,
            duration_minutes,
            &self.rates().competitive,
        )
    }

    #[tracing::instrument(skip(self))]
    pub fn cancellation_fee(
        &self,
        booking_amount: Decimal,
        hours_until_booking: Decimal,
    ) -> CancellationFee {
        self.rates()
            .flat
            .cancellation_fee(booking_amount, hours_until_booking)
    }
}

/// Quote reference shown to riders, e.g. `AGTS-LOYW3V28-9F2C1`
pub fn generate_quote_id(now: DateTime<Utc>) -> String {
    let timestamp = to_base36(now.timestamp_millis().max(0) as u64);
    let random: String = Uuid::new_v4().simple().to_string().chars().take(5).collect();
    format!("AGTS-{}-{}", timestamp, random).to_uppercase()
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
