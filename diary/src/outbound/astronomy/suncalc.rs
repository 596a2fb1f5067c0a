//! Sun and moon positions, phases and rise/set times.
//!
//! Low-precision formulae from Astronomy Answers
//! (<https://www.aa.quae.nl/en/reken/zonpositie.html> and the lunar
//! equivalent). Accuracy is around a minute for event times, which is plenty
//! for fishing advice.

use std::f64::consts::PI;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::domain::Coordinate;
use crate::domain::ports::{Astronomy, MoonIllumination, MoonTimes, SunPosition, SunTimes};

const RAD: f64 = PI / 180.0;
const DAY_MS: f64 = 86_400_000.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;
const OBLIQUITY: f64 = RAD * 23.4397;
const J0: f64 = 0.0009;
const SUN_DISTANCE_KM: f64 = 149_598_000.0;
/// Altitude of the moon's upper limb at rise/set, in radians.
const MOON_HORIZON: f64 = 0.133 * RAD;

/// Sun altitudes (degrees) paired with the morning and evening events they
/// define.
const SUN_EVENTS: [(f64, SunEvent, SunEvent); 6] = [
    (-0.833, SunEvent::Sunrise, SunEvent::Sunset),
    (-0.3, SunEvent::SunriseEnd, SunEvent::SunsetStart),
    (-6.0, SunEvent::Dawn, SunEvent::Dusk),
    (-12.0, SunEvent::NauticalDawn, SunEvent::NauticalDusk),
    (-18.0, SunEvent::NightEnd, SunEvent::Night),
    (6.0, SunEvent::GoldenHourEnd, SunEvent::GoldenHour),
];

#[derive(Clone, Copy)]
enum SunEvent {
    Sunrise,
    Sunset,
    SunriseEnd,
    SunsetStart,
    Dawn,
    Dusk,
    NauticalDawn,
    NauticalDusk,
    NightEnd,
    Night,
    GoldenHourEnd,
    GoldenHour,
}

impl SunEvent {
    fn slot(self, times: &mut SunTimes) -> &mut Option<DateTime<Utc>> {
        match self {
            Self::Sunrise => &mut times.sunrise,
            Self::Sunset => &mut times.sunset,
            Self::SunriseEnd => &mut times.sunrise_end,
            Self::SunsetStart => &mut times.sunset_start,
            Self::Dawn => &mut times.dawn,
            Self::Dusk => &mut times.dusk,
            Self::NauticalDawn => &mut times.nautical_dawn,
            Self::NauticalDusk => &mut times.nautical_dusk,
            Self::NightEnd => &mut times.night_end,
            Self::Night => &mut times.night,
            Self::GoldenHourEnd => &mut times.golden_hour_end,
            Self::GoldenHour => &mut times.golden_hour,
        }
    }
}

/// [`Astronomy`] implementation using closed-form approximations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SunCalcAstronomy;

impl SunCalcAstronomy {
    pub fn new() -> Self {
        Self
    }
}

impl Astronomy for SunCalcAstronomy {
    fn moon_illumination(&self, at: DateTime<Utc>) -> MoonIllumination {
        moon_illumination(at)
    }

    fn moon_times(&self, date: NaiveDate, coordinate: Coordinate) -> MoonTimes {
        moon_times(date, coordinate)
    }

    fn sun_times(&self, date: NaiveDate, coordinate: Coordinate) -> SunTimes {
        sun_times(date, coordinate)
    }

    fn sun_position(&self, at: DateTime<Utc>, coordinate: Coordinate) -> SunPosition {
        sun_position(at, coordinate)
    }
}

// Date conversions.

fn to_julian(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / DAY_MS - 0.5 + J1970
}

fn from_julian(julian: f64) -> Option<DateTime<Utc>> {
    let millis = (julian + 0.5 - J1970) * DAY_MS;
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.round() as i64)
}

fn to_days(at: DateTime<Utc>) -> f64 {
    to_julian(at) - J2000
}

fn hours_later(at: DateTime<Utc>, hours: f64) -> Option<DateTime<Utc>> {
    let millis = hours * 3_600_000.0;
    if !millis.is_finite() {
        return None;
    }
    at.checked_add_signed(TimeDelta::milliseconds(millis.round() as i64))
}

fn utc_at(date: NaiveDate, hour: i64) -> DateTime<Utc> {
    (date.and_time(NaiveTime::MIN) + TimeDelta::hours(hour)).and_utc()
}

// Position helpers shared by sun and moon.

fn right_ascension(longitude: f64, latitude: f64) -> f64 {
    (longitude.sin() * OBLIQUITY.cos() - latitude.tan() * OBLIQUITY.sin()).atan2(longitude.cos())
}

fn declination(longitude: f64, latitude: f64) -> f64 {
    (latitude.sin() * OBLIQUITY.cos() + latitude.cos() * OBLIQUITY.sin() * longitude.sin()).asin()
}

fn azimuth(hour_angle: f64, phi: f64, dec: f64) -> f64 {
    hour_angle
        .sin()
        .atan2(hour_angle.cos() * phi.sin() - dec.tan() * phi.cos())
}

fn altitude(hour_angle: f64, phi: f64, dec: f64) -> f64 {
    (phi.sin() * dec.sin() + phi.cos() * dec.cos() * hour_angle.cos()).asin()
}

fn sidereal_time(days: f64, lw: f64) -> f64 {
    RAD * (280.16 + 360.985_623_5 * days) - lw
}

fn astro_refraction(altitude: f64) -> f64 {
    // The formula only holds for positive altitudes.
    let h = altitude.max(0.0);
    0.000_296_7 / (h + 0.003_125_36 / (h + 0.089_011_79)).tan()
}

// Sun.

fn solar_mean_anomaly(days: f64) -> f64 {
    RAD * (357.5291 + 0.985_600_28 * days)
}

fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    let centre = RAD
        * (1.9148 * mean_anomaly.sin()
            + 0.02 * (2.0 * mean_anomaly).sin()
            + 0.0003 * (3.0 * mean_anomaly).sin());
    let perihelion = RAD * 102.9372;
    mean_anomaly + centre + perihelion + PI
}

struct EquatorialCoords {
    dec: f64,
    ra: f64,
}

fn sun_coords(days: f64) -> EquatorialCoords {
    let longitude = ecliptic_longitude(solar_mean_anomaly(days));
    EquatorialCoords {
        dec: declination(longitude, 0.0),
        ra: right_ascension(longitude, 0.0),
    }
}

fn sun_position(at: DateTime<Utc>, coordinate: Coordinate) -> SunPosition {
    let lw = RAD * -coordinate.longitude();
    let phi = RAD * coordinate.latitude();
    let days = to_days(at);
    let coords = sun_coords(days);
    let hour_angle = sidereal_time(days, lw) - coords.ra;
    SunPosition {
        azimuth: azimuth(hour_angle, phi, coords.dec),
        altitude: altitude(hour_angle, phi, coords.dec),
    }
}

fn julian_cycle(days: f64, lw: f64) -> f64 {
    (days - J0 - lw / (2.0 * PI)).round()
}

fn approx_transit(hour_angle: f64, lw: f64, cycle: f64) -> f64 {
    J0 + (hour_angle + lw) / (2.0 * PI) + cycle
}

fn solar_transit_j(approx: f64, mean_anomaly: f64, longitude: f64) -> f64 {
    J2000 + approx + 0.0053 * mean_anomaly.sin() - 0.0069 * (2.0 * longitude).sin()
}

/// NaN when the sun never reaches `altitude` that day.
fn hour_angle(altitude: f64, phi: f64, dec: f64) -> f64 {
    ((altitude.sin() - phi.sin() * dec.sin()) / (phi.cos() * dec.cos())).acos()
}

fn sun_times(date: NaiveDate, coordinate: Coordinate) -> SunTimes {
    let lw = RAD * -coordinate.longitude();
    let phi = RAD * coordinate.latitude();
    let days = to_days(utc_at(date, 12));
    let cycle = julian_cycle(days, lw);
    let transit = approx_transit(0.0, lw, cycle);
    let mean_anomaly = solar_mean_anomaly(transit);
    let longitude = ecliptic_longitude(mean_anomaly);
    let dec = declination(longitude, 0.0);
    let noon = solar_transit_j(transit, mean_anomaly, longitude);

    let mut times = SunTimes {
        solar_noon: from_julian(noon),
        nadir: from_julian(noon - 0.5),
        ..SunTimes::default()
    };
    for (angle, morning, evening) in SUN_EVENTS {
        let w = hour_angle(angle * RAD, phi, dec);
        let set = solar_transit_j(approx_transit(w, lw, cycle), mean_anomaly, longitude);
        let rise = noon - (set - noon);
        *morning.slot(&mut times) = from_julian(rise);
        *evening.slot(&mut times) = from_julian(set);
    }
    times
}

// Moon.

struct MoonCoords {
    ra: f64,
    dec: f64,
    distance_km: f64,
}

fn moon_coords(days: f64) -> MoonCoords {
    let mean_longitude = RAD * (218.316 + 13.176_396 * days);
    let mean_anomaly = RAD * (134.963 + 13.064_993 * days);
    let mean_distance = RAD * (93.272 + 13.229_350 * days);

    let longitude = mean_longitude + RAD * 6.289 * mean_anomaly.sin();
    let latitude = RAD * 5.128 * mean_distance.sin();
    MoonCoords {
        ra: right_ascension(longitude, latitude),
        dec: declination(longitude, latitude),
        distance_km: 385_001.0 - 20_905.0 * mean_anomaly.cos(),
    }
}

/// Refraction-corrected altitude of the moon in radians.
fn moon_altitude(at: DateTime<Utc>, coordinate: Coordinate) -> f64 {
    let lw = RAD * -coordinate.longitude();
    let phi = RAD * coordinate.latitude();
    let days = to_days(at);
    let coords = moon_coords(days);
    let hour_angle = sidereal_time(days, lw) - coords.ra;
    let h = altitude(hour_angle, phi, coords.dec);
    h + astro_refraction(h)
}

fn moon_illumination(at: DateTime<Utc>) -> MoonIllumination {
    let days = to_days(at);
    let sun = sun_coords(days);
    let moon = moon_coords(days);

    let elongation = (sun.dec.sin() * moon.dec.sin()
        + sun.dec.cos() * moon.dec.cos() * (sun.ra - moon.ra).cos())
    .acos();
    let inclination = (SUN_DISTANCE_KM * elongation.sin())
        .atan2(moon.distance_km - SUN_DISTANCE_KM * elongation.cos());
    let angle = (sun.dec.cos() * (sun.ra - moon.ra).sin()).atan2(
        sun.dec.sin() * moon.dec.cos() - sun.dec.cos() * moon.dec.sin() * (sun.ra - moon.ra).cos(),
    );
    let direction = if angle < 0.0 { -1.0 } else { 1.0 };

    MoonIllumination {
        fraction: (1.0 + inclination.cos()) / 2.0,
        phase: 0.5 + 0.5 * inclination * direction / PI,
        angle,
    }
}

/// Scans the UTC day in two-hour windows, fitting a parabola through the
/// moon's altitude at each window's start, middle and end.
fn moon_times(date: NaiveDate, coordinate: Coordinate) -> MoonTimes {
    let start = utc_at(date, 0);
    let altitude_at = |hours: f64| {
        hours_later(start, hours).map_or(f64::NAN, |at| moon_altitude(at, coordinate) - MOON_HORIZON)
    };

    let mut h0 = altitude_at(0.0);
    let mut rise = None;
    let mut set = None;
    let mut vertex_altitude = 0.0;

    for step in (1..=23).step_by(2) {
        let hour = f64::from(step);
        let h1 = altitude_at(hour);
        let h2 = altitude_at(hour + 1.0);

        let a = (h0 + h2) / 2.0 - h1;
        let b = (h2 - h0) / 2.0;
        let vertex = -b / (2.0 * a);
        vertex_altitude = (a * vertex + b) * vertex + h1;
        let discriminant = b * b - 4.0 * a * h1;

        let mut roots = 0;
        let mut x1 = 0.0;
        let mut x2 = 0.0;
        if discriminant >= 0.0 {
            let dx = discriminant.sqrt() / (a.abs() * 2.0);
            x1 = vertex - dx;
            x2 = vertex + dx;
            if x1.abs() <= 1.0 {
                roots += 1;
            }
            if x2.abs() <= 1.0 {
                roots += 1;
            }
            if x1 < -1.0 {
                x1 = x2;
            }
        }

        match roots {
            1 if h0 < 0.0 => rise = Some(hour + x1),
            1 => set = Some(hour + x1),
            2 => {
                let (r, s) = if vertex_altitude < 0.0 { (x2, x1) } else { (x1, x2) };
                rise = Some(hour + r);
                set = Some(hour + s);
            }
            _ => {}
        }

        if rise.is_some() && set.is_some() {
            break;
        }
        h0 = h2;
    }

    let neither = rise.is_none() && set.is_none();
    MoonTimes {
        rise: rise.and_then(|hours| hours_later(start, hours)),
        set: set.and_then(|hours| hours_later(start, hours)),
        always_up: neither && vertex_altitude > 0.0,
        always_down: neither && vertex_altitude <= 0.0,
    }
}

#[cfg(test)]
mod tests {
    //! Reference values for 2013-03-05 at 50.5N 30.5E.

    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn kyiv() -> Coordinate {
        Coordinate::new(50.5, 30.5).expect("valid coordinate")
    }

    fn instant(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn assert_close_to(actual: Option<DateTime<Utc>>, expected: &str, tolerance_secs: i64) {
        let actual = actual.expect("event should occur");
        let diff = (actual - instant(expected)).num_seconds().abs();
        assert!(
            diff <= tolerance_secs,
            "expected {expected}, got {actual} ({diff}s off)"
        );
    }

    #[rstest]
    fn sun_position_matches_reference(kyiv: Coordinate) {
        let position = sun_position(instant("2013-03-05T00:00:00Z"), kyiv);
        assert!((position.azimuth - -2.500_317_590_716_838_5).abs() < 1e-6);
        assert!((position.altitude - -0.700_040_683_878_161_1).abs() < 1e-6);
    }

    type Field = fn(&SunTimes) -> Option<DateTime<Utc>>;

    #[rstest]
    #[case::solar_noon(|t: &SunTimes| t.solar_noon, "2013-03-05T10:10:57Z")]
    #[case::nadir(|t: &SunTimes| t.nadir, "2013-03-04T22:10:57Z")]
    #[case::sunrise(|t: &SunTimes| t.sunrise, "2013-03-05T04:34:56Z")]
    #[case::sunset(|t: &SunTimes| t.sunset, "2013-03-05T15:46:57Z")]
    #[case::sunrise_end(|t: &SunTimes| t.sunrise_end, "2013-03-05T04:38:19Z")]
    #[case::sunset_start(|t: &SunTimes| t.sunset_start, "2013-03-05T15:43:34Z")]
    #[case::dawn(|t: &SunTimes| t.dawn, "2013-03-05T04:02:17Z")]
    #[case::dusk(|t: &SunTimes| t.dusk, "2013-03-05T16:19:36Z")]
    #[case::nautical_dawn(|t: &SunTimes| t.nautical_dawn, "2013-03-05T03:24:31Z")]
    #[case::nautical_dusk(|t: &SunTimes| t.nautical_dusk, "2013-03-05T16:57:22Z")]
    #[case::night_end(|t: &SunTimes| t.night_end, "2013-03-05T02:46:17Z")]
    #[case::night(|t: &SunTimes| t.night, "2013-03-05T17:35:36Z")]
    #[case::golden_hour_end(|t: &SunTimes| t.golden_hour_end, "2013-03-05T05:19:01Z")]
    #[case::golden_hour(|t: &SunTimes| t.golden_hour, "2013-03-05T15:02:52Z")]
    fn sun_times_match_reference(kyiv: Coordinate, #[case] field: Field, #[case] expected: &str) {
        let times = sun_times(date(2013, 3, 5), kyiv);
        assert_close_to(field(&times), expected, 2);
    }

    #[rstest]
    fn moon_illumination_matches_reference() {
        let illumination = moon_illumination(instant("2013-03-05T00:00:00Z"));
        assert!((illumination.fraction - 0.484_806_820_245_637_3).abs() < 1e-6);
        assert!((illumination.phase - 0.754_836_883_853_876_2).abs() < 1e-6);
        assert!((illumination.angle - 1.673_294_267_857_834_6).abs() < 1e-6);
    }

    #[rstest]
    fn moon_times_match_reference(kyiv: Coordinate) {
        let times = moon_times(date(2013, 3, 4), kyiv);
        assert_close_to(times.rise, "2013-03-04T23:54:29Z", 60);
        assert_close_to(times.set, "2013-03-04T07:47:58Z", 60);
        assert!(!times.always_up);
        assert!(!times.always_down);
    }

    #[test]
    fn polar_summer_has_no_sunset() {
        let svalbard = Coordinate::new(78.22, 15.65).expect("valid coordinate");
        let times = sun_times(date(2024, 6, 21), svalbard);
        assert!(times.sunrise.is_none());
        assert!(times.sunset.is_none());
        assert!(times.solar_noon.is_some());
    }

    #[test]
    fn adapter_delegates_to_formulae() {
        let astronomy = SunCalcAstronomy::new();
        let at = Utc
            .with_ymd_and_hms(2013, 3, 5, 0, 0, 0)
            .single()
            .expect("valid instant");
        assert_eq!(astronomy.moon_illumination(at), moon_illumination(at));
    }
}
