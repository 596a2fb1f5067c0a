//! Outbound adapters implementing domain ports.
//!
//! - **storage**: file-backed and in-memory key-value stores
//! - **weather**: OpenWeatherMap over reqwest
//! - **astronomy**: local sun and moon calculations
//! - **geolocation**: fixed-answer provider for hosts without GPS
//! - **image_picker**: preset photo selections
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod astronomy;
pub mod geolocation;
pub mod image_picker;
pub mod storage;
pub mod weather;
