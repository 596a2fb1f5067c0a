//! Fishing advice derived from the moon phase and the weather.
//!
//! These are fixed lookup tables; [`super::ForecastService`] feeds them with
//! astronomy and weather data.

use serde::Serialize;

use super::weather::ConditionGroup;

/// One of the eight named moon phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Categorise a lunar cycle fraction (0 new, 0.5 full, wrapping at 1).
    pub fn from_cycle_fraction(phase: f64) -> Self {
        match phase {
            p if p < 0.03 => Self::NewMoon,
            p if p < 0.25 => Self::WaxingCrescent,
            p if p < 0.28 => Self::FirstQuarter,
            p if p < 0.47 => Self::WaxingGibbous,
            p if p < 0.53 => Self::FullMoon,
            p if p < 0.72 => Self::WaningGibbous,
            p if p < 0.78 => Self::LastQuarter,
            p if p < 0.97 => Self::WaningCrescent,
            _ => Self::NewMoon,
        }
    }

    /// Human-readable name, e.g. "Waxing Gibbous".
    pub fn label(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }

    /// Fishing score out of 10 for this phase.
    pub fn score(self) -> u8 {
        match self {
            Self::NewMoon => 8,
            Self::WaxingCrescent | Self::WaningCrescent => 7,
            Self::FirstQuarter | Self::LastQuarter => 6,
            Self::WaxingGibbous | Self::WaningGibbous => 5,
            Self::FullMoon => 9,
        }
    }
}

/// Score used when the weather is unknown or not in the table.
pub const NEUTRAL_WEATHER_SCORE: u8 = 5;

/// Fishing score out of 10 for a weather condition group.
pub fn weather_score(group: Option<&ConditionGroup>) -> u8 {
    match group {
        Some(ConditionGroup::Clear) => 8,
        Some(ConditionGroup::Clouds) => 7,
        Some(ConditionGroup::Rain) => 4,
        Some(ConditionGroup::Thunderstorm) => 2,
        Some(ConditionGroup::Snow) => 3,
        Some(ConditionGroup::Mist) => 6,
        Some(ConditionGroup::Fog) => 5,
        _ => NEUTRAL_WEATHER_SCORE,
    }
}

/// Overall rating: the mean of both scores, halves rounded up.
pub fn fishing_rating(phase: MoonPhase, group: Option<&ConditionGroup>) -> u8 {
    (phase.score() + weather_score(group)).div_ceil(2)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoonAdvice {
    pub general: &'static str,
    pub tips: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherAdvice {
    pub tips: &'static [&'static str],
}

pub fn moon_advice(phase: MoonPhase) -> MoonAdvice {
    match phase {
        MoonPhase::NewMoon => MoonAdvice {
            general: "Excellent fishing period! Fish are more active during the new moon.",
            tips: &[
                "Fish tend to feed more during this time",
                "Best results during dawn and dusk",
                "Use dark-colored lures",
            ],
        },
        MoonPhase::FullMoon => MoonAdvice {
            general: "Peak fishing time! Fish activity is at its highest.",
            tips: &[
                "Fish are likely to feed throughout the night",
                "Use light-colored or reflective lures",
                "Focus on shallow waters",
            ],
        },
        MoonPhase::FirstQuarter => MoonAdvice {
            general: "Good fishing conditions, especially during moonrise.",
            tips: &[
                "Focus on the hours around moonrise",
                "Try both surface and deep water fishing",
                "Moderate lure colors work best",
            ],
        },
        _ => MoonAdvice {
            general: "Moderate fishing conditions.",
            tips: &[
                "Try different depths",
                "Experiment with lure colors",
                "Focus on known fishing spots",
            ],
        },
    }
}

pub fn weather_advice(group: Option<&ConditionGroup>) -> WeatherAdvice {
    let tips: &'static [&'static str] = match group {
        Some(ConditionGroup::Clear) => &[
            "Use sunscreen and stay hydrated",
            "Fish might be deeper in water during bright days",
            "Early morning and late evening are best",
        ],
        Some(ConditionGroup::Clouds) => &[
            "Ideal conditions for fishing",
            "Fish might be more active near surface",
            "Try different depths throughout the day",
        ],
        Some(ConditionGroup::Rain) => &[
            "Fish are often more active before and after rain",
            "Use brighter lures for better visibility",
            "Focus on areas where rain creates surface disturbance",
        ],
        _ => &[
            "Check local fishing reports",
            "Adjust techniques based on conditions",
        ],
    };
    WeatherAdvice { tips }
}

/// Suggested time windows for the phase.
pub fn best_times(phase: MoonPhase) -> &'static [&'static str] {
    match phase {
        MoonPhase::NewMoon => &["Dawn (30min before sunrise)", "Dusk (30min after sunset)"],
        MoonPhase::FullMoon => &["Midnight to 2AM", "Noon to 2PM"],
        _ => &["Early morning", "Late evening"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, MoonPhase::NewMoon)]
    #[case(0.029, MoonPhase::NewMoon)]
    #[case(0.03, MoonPhase::WaxingCrescent)]
    #[case(0.25, MoonPhase::FirstQuarter)]
    #[case(0.28, MoonPhase::WaxingGibbous)]
    #[case(0.47, MoonPhase::FullMoon)]
    #[case(0.5, MoonPhase::FullMoon)]
    #[case(0.53, MoonPhase::WaningGibbous)]
    #[case(0.72, MoonPhase::LastQuarter)]
    #[case(0.78, MoonPhase::WaningCrescent)]
    #[case(0.97, MoonPhase::NewMoon)]
    #[case(0.999, MoonPhase::NewMoon)]
    fn phase_boundaries(#[case] fraction: f64, #[case] expected: MoonPhase) {
        assert_eq!(MoonPhase::from_cycle_fraction(fraction), expected);
    }

    #[rstest]
    #[case(MoonPhase::FullMoon, Some(ConditionGroup::Clear), 9)]
    #[case(MoonPhase::NewMoon, Some(ConditionGroup::Clouds), 8)]
    #[case(MoonPhase::WaxingGibbous, Some(ConditionGroup::Thunderstorm), 4)]
    #[case(MoonPhase::FirstQuarter, Some(ConditionGroup::Rain), 5)]
    #[case(MoonPhase::WaningCrescent, Some(ConditionGroup::Snow), 5)]
    #[case(MoonPhase::LastQuarter, Some(ConditionGroup::Drizzle), 6)]
    #[case(MoonPhase::FullMoon, None, 7)]
    fn rating_averages_and_rounds_half_up(
        #[case] phase: MoonPhase,
        #[case] group: Option<ConditionGroup>,
        #[case] expected: u8,
    ) {
        assert_eq!(fishing_rating(phase, group.as_ref()), expected);
    }

    #[test]
    fn unlisted_phases_get_moderate_advice() {
        let advice = moon_advice(MoonPhase::WaningGibbous);
        assert_eq!(advice.general, "Moderate fishing conditions.");
        assert_eq!(advice.tips.len(), 3);
    }

    #[test]
    fn unknown_weather_gets_generic_tips() {
        let haze = ConditionGroup::Other("Haze".into());
        assert_eq!(weather_advice(Some(&haze)).tips.len(), 2);
        assert_eq!(weather_advice(None), weather_advice(Some(&haze)));
    }

    #[test]
    fn best_times_default_to_morning_and_evening() {
        assert_eq!(
            best_times(MoonPhase::LastQuarter),
            ["Early morning", "Late evening"]
        );
        assert_eq!(best_times(MoonPhase::FullMoon)[0], "Midnight to 2AM");
    }
}
