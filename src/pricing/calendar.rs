//! Pickup time helpers.
//!
//! Turn a pickup time into the flags the fare engine consumes. Callers derive
//! the flags here and pass them in; the engine never looks at a clock.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::models::ServiceWindow;

/// Weekday rush hours: 06:00-09:00 and 16:00-19:00, end exclusive
pub fn is_peak_hour(at: NaiveDateTime) -> bool {
    if matches!(at.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }
    let hour = at.hour();
    (6..9).contains(&hour) || (16..19).contains(&hour)
}

/// 22:00 through 06:00
pub fn is_after_hours(at: NaiveDateTime) -> bool {
    let hour = at.hour();
    hour >= 22 || hour < 6
}

/// Friday 17:00 through Monday 06:00
pub fn is_weekend(at: NaiveDateTime) -> bool {
    let hour = at.hour();
    match at.weekday() {
        Weekday::Fri => hour >= 17,
        Weekday::Sat | Weekday::Sun => true,
        Weekday::Mon => hour < 6,
        _ => false,
    }
}

impl ServiceWindow {
    /// Surcharge windows for a pickup. Airports and holidays are not derivable
    /// from the time alone, so the caller supplies them.
    pub fn at(pickup: NaiveDateTime, airport: bool, holiday: bool) -> Self {
        Self {
            airport,
            after_hours: is_after_hours(pickup),
            weekend: is_weekend(pickup),
            holiday,
        }
    }
}

/// AM/PM marker from the booking form's time picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Meridiem {
    Am,
    Pm,
}

/// Convert a 12-hour clock hour (1-12) to 0-23
pub fn to_24_hour(hour12: u32, meridiem: Meridiem) -> Option<u32> {
    if !(1..=12).contains(&hour12) {
        return None;
    }
    Some(match (meridiem, hour12) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Am, h) => h,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Pm, h) => h + 12,
    })
}

/// Pickup time from the picker's date, 12-hour clock hour and minute
pub fn pickup_time(
    date: NaiveDate,
    hour12: u32,
    minute: u32,
    meridiem: Meridiem,
) -> Option<NaiveDateTime> {
    date.and_hms_opt(to_24_hour(hour12, meridiem)?, minute, 0)
}
