//! Astronomy adapter computing sun and moon data locally.

mod suncalc;

pub use suncalc::SunCalcAstronomy;
