//! One contract over both rate schedules.

use super::competitive;
use super::models::{FareQuote, Schedule, TripAttributes};
use super::rates::{FlatRateSchedule, RateBook, RateConfig};

/// A rate schedule able to price a trip.
///
/// Implementations are pure: the same trip always yields the same quote and
/// nothing outside the arguments is read.
pub trait PricingStrategy: Send + Sync {
    fn schedule(&self) -> Schedule;

    fn quote(&self, attrs: &TripAttributes) -> FareQuote;
}

impl PricingStrategy for RateConfig {
    fn schedule(&self) -> Schedule {
        Schedule::Competitive
    }

    fn quote(&self, attrs: &TripAttributes) -> FareQuote {
        competitive::quote(attrs, self)
    }
}

impl PricingStrategy for FlatRateSchedule {
    fn schedule(&self) -> Schedule {
        Schedule::Flat
    }

    fn quote(&self, attrs: &TripAttributes) -> FareQuote {
        // Inherent method
        FlatRateSchedule::quote(self, attrs)
    }
}

impl RateBook {
    /// Strategy for the requested schedule
    pub fn strategy(&self, schedule: Schedule) -> &dyn PricingStrategy {
        match schedule {
            Schedule::Competitive => &self.competitive,
            Schedule::Flat => &self.flat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_strategy_selection() {
        let book = RateBook::builtin().unwrap();
        let attrs = TripAttributes::new(dec!(10), dec!(25));

        for schedule in [Schedule::Competitive, Schedule::Flat] {
            let strategy = book.strategy(schedule);
            assert_eq!(strategy.schedule(), schedule);
            assert_eq!(strategy.quote(&attrs).schedule, schedule);
        }
    }

    #[test]
    fn test_strategies_agree_with_direct_calls() {
        let book = RateBook::builtin().unwrap();
        let attrs = TripAttributes::new(dec!(10), dec!(25)).with_pets(true);

        assert_eq!(
            book.strategy(Schedule::Competitive).quote(&attrs),
            competitive::quote(&attrs, &book.competitive)
        );
        assert_eq!(
            book.strategy(Schedule::Flat).quote(&attrs).total,
            dec!(206.00)
        );
    }
}
