//! Pricing API route handlers, mounted under `/api/pricing`.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::calculators::format_usd;
use super::competitive::BenchmarkComparison;
use super::flat::CancellationFee;
use super::requests::{CancellationFeeRequest, CompareRequest, EstimateRequest, QuoteRequest};
use super::responses::{EstimateResponse, HourlyTierResponse, QuoteResponse, RateTableResponse};
use super::rates::RateBook;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote))
        .route("/estimate", post(estimate))
        .route("/compare", post(compare))
        .route("/cancellation-fee", post(cancellation_fee))
        .route("/rates", get(rates))
        .route("/rates/reload", post(reload_rates))
}

/// Quote a trip on the requested schedule
async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let (schedule, trip) = request.into_trip()?;
    let issued = state.pricing.quote(schedule, &trip);
    Ok(Json(issued.into()))
}

async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>> {
    request.validate()?;
    let total = state.pricing.estimate(
        request.distance_miles,
        request.duration_minutes,
        &request.options,
    );
    Ok(Json(EstimateResponse {
        total,
        display_total: format_usd(total),
    }))
}

async fn compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<BenchmarkComparison>> {
    request.validate()?;
    Ok(Json(
        state
            .pricing
            .compare_to_benchmark(request.distance_miles, request.duration_minutes),
    ))
}

async fn cancellation_fee(
    State(state): State<AppState>,
    Json(request): Json<CancellationFeeRequest>,
) -> Json<CancellationFee> {
    Json(
        state
            .pricing
            .cancellation_fee(request.booking_amount, request.hours_until_booking),
    )
}

async fn rates(State(state): State<AppState>) -> Json<RateTableResponse> {
    Json(rate_table_summary(&state.pricing.rates()))
}

/// Re-read the rate table from disk without restarting
async fn reload_rates(State(state): State<AppState>) -> Result<Json<RateTableResponse>> {
    let book = state.pricing.reload()?;
    Ok(Json(rate_table_summary(&book)))
}

fn rate_table_summary(book: &RateBook) -> RateTableResponse {
    RateTableResponse {
        version: book.version,
        vehicle_tiers: book
            .competitive
            .vehicle_type_multiplier
            .keys()
            .cloned()
            .collect(),
        hourly_tiers: book
            .flat
            .hourly
            .iter()
            .map(|(tier, rate)| HourlyTierResponse {
                tier: tier.clone(),
                description: rate.description.clone(),
                max_passengers: rate.max_passengers,
                max_luggage: rate.max_luggage,
                base_rate: rate.base_rate,
                minimum_hours: rate.minimum_hours,
            })
            .collect(),
    }
}
