//! Headless core of the fishing diary app.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the location
//! state machine, the spot and profile stores, weather and fishing forecast
//! services, and the ports they depend on; [`outbound`] provides adapters for
//! those ports. The platform shell owns the UI and drives everything through
//! an explicitly passed [`domain::AppState`].

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;
