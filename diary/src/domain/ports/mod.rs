//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (platform geolocation, on-device storage, the weather API, astronomy
//! routines, the photo picker). Each trait exposes strongly typed errors so
//! adapters map their failures into predictable variants instead of
//! returning `anyhow::Result`.

mod macros;

pub(crate) use macros::define_port_error;

mod astronomy;
mod geolocation;
mod image_picker;
mod key_value_store;
mod weather_source;

#[cfg(test)]
pub use astronomy::MockAstronomy;
pub use astronomy::{Astronomy, MoonIllumination, MoonTimes, SunPosition, SunTimes};
#[cfg(test)]
pub use geolocation::MockGeolocationProvider;
pub use geolocation::{
    DEFAULT_POSITION_MAX_AGE, DEFAULT_POSITION_TIMEOUT, GeolocationError, GeolocationProvider,
    PermissionOutcome, PositionFix, PositionOptions,
};
#[cfg(test)]
pub use image_picker::MockImagePicker;
pub use image_picker::{ImagePicker, ImagePickerError, PickedImage};
#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, KeyValueStoreError, PROFILE_KEY, SPOTS_KEY};
#[cfg(test)]
pub use weather_source::MockWeatherSource;
pub use weather_source::{WeatherSource, WeatherSourceError};
