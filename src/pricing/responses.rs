//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::models::{Breakdown, Schedule};
use super::services::IssuedQuote;

/// Response for a trip quote
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote_id: String,
    pub schedule: Schedule,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    pub breakdown: Breakdown,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_mile: Decimal,
    pub display_total: String,
}

impl From<IssuedQuote> for QuoteResponse {
    fn from(issued: IssuedQuote) -> Self {
        Self {
            quote_id: issued.quote_id,
            schedule: issued.quote.schedule,
            total: issued.quote.total,
            subtotal: issued.quote.subtotal,
            breakdown: issued.quote.breakdown,
            price_per_mile: issued.quote.price_per_mile,
            display_total: issued.display_total,
        }
    }
}

/// Response for a quick estimate
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub display_total: String,
}

/// Rate table summary
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTableResponse {
    pub version: u32,
    /// Tiers priced by the competitive schedule
    pub vehicle_tiers: Vec<String>,
    /// Tiers rentable by the hour on the flat schedule
    pub hourly_tiers: Vec<HourlyTierResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyTierResponse {
    pub tier: String,
    pub description: String,
    pub max_passengers: u32,
    pub max_luggage: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub minimum_hours: Decimal,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
