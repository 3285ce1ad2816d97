//! Request DTOs for pricing API endpoints.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppError;

use super::calendar::{self, Meridiem};
use super::competitive::EstimateOptions;
use super::models::{
    AdditionalServices, Schedule, ServiceWindow, TripAttributes, DEFAULT_VEHICLE_TIER,
    MAX_DISTANCE_MILES, MAX_DURATION_MINUTES, MAX_HOURS,
};

/// Reject a trip measurement above the largest value the engines price
fn check_limit(field: &str, value: Decimal, max: Decimal) -> Result<(), AppError> {
    if value > max {
        return Err(AppError::BadRequest(format!("{} must not exceed {}", field, max)));
    }
    Ok(())
}

fn check_trip_limits(
    distance_miles: Decimal,
    duration_minutes: Option<Decimal>,
) -> Result<(), AppError> {
    check_limit("distanceMiles", distance_miles, MAX_DISTANCE_MILES)?;
    if let Some(minutes) = duration_minutes {
        check_limit("durationMinutes", minutes, MAX_DURATION_MINUTES)?;
    }
    Ok(())
}

/// Pickup time as entered in the booking form's picker
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPicker {
    pub date: NaiveDate,
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    pub meridiem: Meridiem,
}

/// Request to quote a trip.
///
/// Peak-hour, after-hours and weekend flags may be sent explicitly; when
/// omitted they are derived from the pickup time, and default to off when
/// there is no pickup time either.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub schedule: Schedule,
    pub distance_miles: Decimal,
    #[serde(default)]
    pub duration_minutes: Decimal,
    #[serde(default)]
    pub passenger_count: Option<u32>,
    #[serde(default)]
    pub has_pets: bool,
    #[serde(default)]
    pub additional_stop_count: u32,
    #[serde(default)]
    pub vehicle_tier: Option<String>,
    #[serde(default)]
    pub pickup_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub pickup: Option<PickupPicker>,
    #[serde(default)]
    pub is_peak_hour: Option<bool>,
    #[serde(default)]
    pub after_hours: Option<bool>,
    #[serde(default)]
    pub weekend: Option<bool>,
    #[serde(default)]
    pub airport: bool,
    #[serde(default)]
    pub holiday: bool,
    #[serde(default)]
    pub services: AdditionalServices,
    #[serde(default)]
    pub booked_hours: Option<Decimal>,
    #[serde(default)]
    pub include_chauffeur: Option<bool>,
}

impl QuoteRequest {
    /// Resolve the pickup time, preferring an explicit timestamp over the picker
    pub fn pickup_time(&self) -> Result<Option<NaiveDateTime>, AppError> {
        if let Some(at) = self.pickup_at {
            return Ok(Some(at));
        }
        match &self.pickup {
            Some(picker) => {
                calendar::pickup_time(picker.date, picker.hour, picker.minute, picker.meridiem)
                    .map(Some)
                    .ok_or_else(|| {
                        AppError::BadRequest(format!(
                            "Invalid pickup time {}:{:02} {:?}",
                            picker.hour, picker.minute, picker.meridiem
                        ))
                    })
            }
            None => Ok(None),
        }
    }

    /// Engine input for this request
    pub fn into_trip(self) -> Result<(Schedule, TripAttributes), AppError> {
        check_trip_limits(self.distance_miles, Some(self.duration_minutes))?;
        if let Some(hours) = self.booked_hours {
            check_limit("bookedHours", hours, MAX_HOURS)?;
        }
        check_limit(
            "services.waitTimeHours",
            self.services.wait_time_hours,
            MAX_HOURS,
        )?;

        let pickup = self.pickup_time()?;

        let derived = pickup.map(|at| ServiceWindow::at(at, self.airport, self.holiday));
        let window = ServiceWindow {
            airport: self.airport,
            after_hours: self
                .after_hours
                .or(derived.map(|w| w.after_hours))
                .unwrap_or(false),
            weekend: self
                .weekend
                .or(derived.map(|w| w.weekend))
                .unwrap_or(false),
            holiday: self.holiday,
        };
        let is_peak_hour = self
            .is_peak_hour
            .or(pickup.map(calendar::is_peak_hour))
            .unwrap_or(false);

        let trip = TripAttributes {
            distance_miles: self.distance_miles,
            duration_minutes: self.duration_minutes,
            passenger_count: self.passenger_count.unwrap_or(1),
            has_pets: self.has_pets,
            additional_stop_count: self.additional_stop_count,
            is_peak_hour,
            vehicle_tier: self
                .vehicle_tier
                .unwrap_or_else(|| DEFAULT_VEHICLE_TIER.to_string()),
            service_window: window,
            services: self.services,
            booked_hours: self.booked_hours,
            include_chauffeur: self.include_chauffeur.unwrap_or(true),
        };

        Ok((self.schedule, trip))
    }
}

/// Request for a quick competitive estimate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub distance_miles: Decimal,
    #[serde(default)]
    pub duration_minutes: Option<Decimal>,
    #[serde(default)]
    pub options: EstimateOptions,
}

impl EstimateRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        check_trip_limits(self.distance_miles, self.duration_minutes)
    }
}

/// Request to compare against the competitor benchmark
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub distance_miles: Decimal,
    #[serde(default)]
    pub duration_minutes: Option<Decimal>,
}

impl CompareRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        check_trip_limits(self.distance_miles, self.duration_minutes)
    }
}

/// Request to look up a cancellation fee
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationFeeRequest {
    pub booking_amount: Decimal,
    pub hours_until_booking: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn request(body: serde_json::Value) -> QuoteRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_defaults() {
        let (schedule, trip) = request(json!({ "distanceMiles": 10 }))
            .into_trip()
            .unwrap();

        assert_eq!(schedule, Schedule::Competitive);
        assert_eq!(trip.distance_miles, dec!(10));
        assert_eq!(trip.duration_minutes, dec!(0));
        assert_eq!(trip.passenger_count, 1);
        assert_eq!(trip.vehicle_tier, "premium");
        assert!(!trip.is_peak_hour);
        assert!(trip.include_chauffeur);
        assert_eq!(trip.service_window, ServiceWindow::default());
    }

    #[test]
    fn test_flags_derived_from_pickup_at() {
        // Friday 17:30
        let (_, trip) = request(json!({
            "distanceMiles": "12.5",
            "pickupAt": "2024-03-08T17:30:00",
            "airport": true
        }))
        .into_trip()
        .unwrap();

        assert_eq!(trip.distance_miles, dec!(12.5));
        assert!(trip.is_peak_hour);
        assert!(trip.service_window.weekend);
        assert!(trip.service_window.airport);
        assert!(!trip.service_window.after_hours);
    }

    #[test]
    fn test_explicit_flags_win() {
        let (_, trip) = request(json!({
            "distanceMiles": 3,
            "pickupAt": "2024-03-08T17:30:00",
            "isPeakHour": false,
            "weekend": false
        }))
        .into_trip()
        .unwrap();

        assert!(!trip.is_peak_hour);
        assert!(!trip.service_window.weekend);
    }

    #[test]
    fn test_picker_time() {
        let (schedule, trip) = request(json!({
            "schedule": "flat",
            "distanceMiles": 3,
            "pickup": { "date": "2024-03-05", "hour": 11, "minute": 15, "meridiem": "PM" }
        }))
        .into_trip()
        .unwrap();

        assert_eq!(schedule, Schedule::Flat);
        assert!(trip.service_window.after_hours);
        assert!(!trip.is_peak_hour);
    }

    #[test]
    fn test_invalid_picker_time_rejected() {
        let err = request(json!({
            "distanceMiles": 3,
            "pickup": { "date": "2024-03-05", "hour": 13, "meridiem": "AM" }
        }))
        .into_trip()
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_oversized_trip_rejected() {
        let err = request(json!({ "distanceMiles": "79228162514264337593543950335" }))
            .into_trip()
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = request(json!({ "distanceMiles": 10, "bookedHours": 721 }))
            .into_trip()
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = request(json!({ "distanceMiles": 10, "services": { "waitTimeHours": 1000 } }))
            .into_trip()
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_trip_at_limits_accepted() {
        let (_, trip) = request(json!({
            "distanceMiles": 10000,
            "durationMinutes": 43200,
            "bookedHours": 720
        }))
        .into_trip()
        .unwrap();
        assert_eq!(trip.distance_miles, MAX_DISTANCE_MILES);
    }

    #[test]
    fn test_estimate_and_compare_limits() {
        let estimate: EstimateRequest =
            serde_json::from_value(json!({ "distanceMiles": 10, "durationMinutes": 50000 }))
                .unwrap();
        assert!(estimate.validate().is_err());

        let compare: CompareRequest =
            serde_json::from_value(json!({ "distanceMiles": 10001 })).unwrap();
        assert!(compare.validate().is_err());

        let compare: CompareRequest =
            serde_json::from_value(json!({ "distanceMiles": 10 })).unwrap();
        assert!(compare.validate().is_ok());
    }
}
