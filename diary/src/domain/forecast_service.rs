//! Daily fishing forecast combining astronomy with the weather tables.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use serde::Serialize;
use tracing::debug;

use super::fishing::{self, MoonAdvice, MoonPhase, WeatherAdvice};
use super::ports::{Astronomy, MoonIllumination, MoonTimes, SunTimes};
use super::weather::ConditionGroup;
use super::Coordinate;

/// Everything the moon screen shows for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FishingForecast {
    pub date: NaiveDate,
    pub coordinate: Coordinate,
    /// Overall rating out of 10.
    pub rating: u8,
    pub moon_phase: MoonPhase,
    pub moon_phase_label: &'static str,
    /// Illuminated share of the moon, rounded to a whole percent.
    pub illumination_percent: u8,
    pub moon_illumination: MoonIllumination,
    pub moon_advice: MoonAdvice,
    pub weather_advice: WeatherAdvice,
    pub best_times: Vec<String>,
    pub moon_times: MoonTimes,
    pub sun_times: SunTimes,
}

/// Builds [`FishingForecast`]s from an [`Astronomy`] port.
pub struct ForecastService<A: ?Sized> {
    astronomy: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<A> ForecastService<A>
where
    A: Astronomy + ?Sized,
{
    pub fn new(astronomy: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self { astronomy, clock }
    }

    /// Forecast for `date` at `coordinate`.
    ///
    /// Illumination is sampled at 12:00 UTC; moon times cover the UTC day.
    /// `weather` is the current condition group, if known.
    pub fn forecast(
        &self,
        coordinate: Coordinate,
        date: NaiveDate,
        weather: Option<&ConditionGroup>,
    ) -> FishingForecast {
        let noon = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN + TimeDelta::hours(12)));
        let illumination = self.astronomy.moon_illumination(noon);
        let phase = MoonPhase::from_cycle_fraction(illumination.phase);
        let rating = fishing::fishing_rating(phase, weather);
        debug!(%date, %coordinate, ?phase, rating, "computed fishing forecast");

        FishingForecast {
            date,
            coordinate,
            rating,
            moon_phase: phase,
            moon_phase_label: phase.label(),
            illumination_percent: illumination_percent(illumination.fraction),
            moon_illumination: illumination,
            moon_advice: fishing::moon_advice(phase),
            weather_advice: fishing::weather_advice(weather),
            best_times: fishing::best_times(phase)
                .iter()
                .map(|slot| (*slot).to_owned())
                .collect(),
            moon_times: self.astronomy.moon_times(date, coordinate),
            sun_times: self.astronomy.sun_times(date, coordinate),
        }
    }

    /// Forecast for the current UTC date.
    pub fn forecast_today(
        &self,
        coordinate: Coordinate,
        weather: Option<&ConditionGroup>,
    ) -> FishingForecast {
        self.forecast(coordinate, self.clock.utc().date_naive(), weather)
    }
}

fn illumination_percent(fraction: f64) -> u8 {
    let clamped = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    // Clamped to 0..=100, so the cast cannot truncate.
    (clamped * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockAstronomy;
    use chrono::{DateTime, Timelike};
    use mockable::MockClock;
    use rstest::rstest;

    fn fixed_astronomy(phase: f64, fraction: f64) -> MockAstronomy {
        let mut astronomy = MockAstronomy::new();
        astronomy
            .expect_moon_illumination()
            .returning(move |_| MoonIllumination {
                fraction,
                phase,
                angle: 0.0,
            });
        astronomy
            .expect_moon_times()
            .returning(|_, _| MoonTimes::default());
        astronomy
            .expect_sun_times()
            .returning(|_, _| SunTimes::default());
        astronomy
    }

    fn clock_at(now: DateTime<Utc>) -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now);
        Arc::new(clock)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn full_moon_and_clear_sky_rate_highly() {
        let service = ForecastService::new(
            Arc::new(fixed_astronomy(0.5, 0.998)),
            clock_at(Utc::now()),
        );
        let clear = ConditionGroup::Clear;

        let forecast = service.forecast(crate::domain::SAN_FRANCISCO, date(2024, 4, 23), Some(&clear));

        assert_eq!(forecast.moon_phase, MoonPhase::FullMoon);
        assert_eq!(forecast.rating, 9);
        assert_eq!(forecast.illumination_percent, 100);
        assert_eq!(forecast.best_times, ["Midnight to 2AM", "Noon to 2PM"]);
        assert_eq!(forecast.moon_phase_label, "Full Moon");
    }

    #[test]
    fn illumination_is_sampled_at_utc_noon() {
        let mut astronomy = MockAstronomy::new();
        astronomy
            .expect_moon_illumination()
            .withf(|at| at.hour() == 12 && at.date_naive() == date(2024, 1, 11))
            .times(1)
            .returning(|_| MoonIllumination {
                fraction: 0.004,
                phase: 0.99,
                angle: 0.0,
            });
        astronomy
            .expect_moon_times()
            .returning(|_, _| MoonTimes::default());
        astronomy
            .expect_sun_times()
            .returning(|_, _| SunTimes::default());
        let service = ForecastService::new(Arc::new(astronomy), clock_at(Utc::now()));

        let forecast = service.forecast(crate::domain::SAN_FRANCISCO, date(2024, 1, 11), None);

        assert_eq!(forecast.moon_phase, MoonPhase::NewMoon);
        assert_eq!(forecast.rating, 7);
    }

    #[test]
    fn forecast_today_uses_clock_date() {
        let now = Utc
            .with_ymd_and_hms(2024, 6, 1, 23, 30, 0)
            .single()
            .expect("valid instant");
        let service = ForecastService::new(Arc::new(fixed_astronomy(0.3, 0.6)), clock_at(now));

        let forecast = service.forecast_today(crate::domain::SAN_FRANCISCO, None);

        assert_eq!(forecast.date, date(2024, 6, 1));
        assert_eq!(forecast.moon_phase, MoonPhase::WaxingGibbous);
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(0.494, 49)]
    #[case(0.496, 50)]
    #[case(1.2, 100)]
    #[case(f64::NAN, 0)]
    fn illumination_percent_is_rounded_and_bounded(#[case] fraction: f64, #[case] expected: u8) {
        assert_eq!(illumination_percent(fraction), expected);
    }
}
