//! Print a fishing forecast for a location and day as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use fishing_diary::config::DiarySettings;
use fishing_diary::domain::{
    Coordinate, FishingForecast, ForecastService, LocationController, SpotStore, WeatherReport,
    WeatherService,
};
use fishing_diary::outbound::astronomy::SunCalcAstronomy;
use fishing_diary::outbound::geolocation::StaticGeolocationProvider;
use fishing_diary::outbound::storage::DiskKeyValueStore;
use fishing_diary::outbound::weather::OpenWeatherHttpSource;
use fishing_diary::telemetry::init_tracing;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::warn;

/// `fishing-forecast` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fishing-forecast",
    about = "Moon phase, sun times, weather and a fishing rating for one place and day",
    version
)]
struct CliArgs {
    /// Latitude in decimal degrees. Uses the configured default when omitted.
    #[arg(long = "lat", value_name = "degrees", allow_negative_numbers = true, requires = "longitude")]
    latitude: Option<f64>,
    /// Longitude in decimal degrees.
    #[arg(long = "lon", value_name = "degrees", allow_negative_numbers = true, requires = "latitude")]
    longitude: Option<f64>,
    /// Forecast at a saved spot, matched by title or id, from the data directory.
    #[arg(long = "spot", value_name = "title", conflicts_with_all = ["latitude", "longitude"])]
    spot: Option<String>,
    /// Day to forecast as `YYYY-MM-DD`. Defaults to today (UTC).
    #[arg(long = "date", value_name = "date")]
    date: Option<NaiveDate>,
    /// Skip the weather lookup even when an API key is configured.
    #[arg(long = "no-weather")]
    no_weather: bool,
}

#[derive(Serialize)]
struct Output {
    location: Coordinate,
    is_fallback: bool,
    weather: Option<WeatherReport>,
    forecast: FishingForecast,
}

fn main() -> io::Result<()> {
    init_tracing();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = DiarySettings::load_from_iter([std::ffi::OsString::from("fishing-forecast")])
        .map_err(|error| io::Error::other(format!("load configuration: {error}")))?;
    let default_location = settings.default_location().map_err(io::Error::other)?;

    let (location, is_fallback) = resolve_location(&args, &settings, default_location).await?;
    let weather = if args.no_weather {
        None
    } else {
        fetch_weather(&settings, location).await
    };

    let forecasts = ForecastService::new(Arc::new(SunCalcAstronomy::new()), Arc::new(DefaultClock));
    let group = weather.as_ref().map(|report| &report.condition.group);
    let forecast = match args.date {
        Some(date) => forecasts.forecast(location, date, group),
        None => forecasts.forecast_today(location, group),
    };

    let output = Output {
        location,
        is_fallback,
        weather,
        forecast,
    };
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output).map_err(io::Error::other)?;
    writeln!(stdout)
}

/// A position given on the command line is treated as a device fix; without
/// one the controller falls back to the configured default.
async fn resolve_location(
    args: &CliArgs,
    settings: &DiarySettings,
    default_location: Coordinate,
) -> io::Result<(Coordinate, bool)> {
    if let Some(wanted) = args.spot.as_deref() {
        return saved_spot_location(settings, wanted).await.map(|location| (location, false));
    }
    let (Some(latitude), Some(longitude)) = (args.latitude, args.longitude) else {
        let mut controller =
            LocationController::new(Arc::new(StaticGeolocationProvider::denied()))
                .with_default_location(default_location);
        let location = controller.use_default();
        return Ok((location, controller.state().is_fallback));
    };

    let fix = Coordinate::new(latitude, longitude).map_err(io::Error::other)?;
    let mut controller = LocationController::new(Arc::new(StaticGeolocationProvider::at(fix)))
        .with_default_location(default_location)
        .with_options(settings.position_options());
    let location = controller
        .locate()
        .await
        .map_err(|error| io::Error::other(format!("resolve location: {error}")))?;
    Ok((location, controller.state().is_fallback))
}

async fn saved_spot_location(settings: &DiarySettings, wanted: &str) -> io::Result<Coordinate> {
    let data_dir = settings.data_dir();
    let storage = DiskKeyValueStore::open(&data_dir)
        .map_err(|error| io::Error::other(format!("open data directory {data_dir}: {error}")))?;
    let mut spots = SpotStore::new(Arc::new(storage));
    spots
        .load()
        .await
        .iter()
        .find(|spot| spot.title == wanted || spot.id.as_str() == wanted)
        .map(|spot| spot.coordinate)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no saved spot named {wanted:?} in {data_dir}"),
            )
        })
}

async fn fetch_weather(settings: &DiarySettings, location: Coordinate) -> Option<WeatherReport> {
    let api_key = settings.weather_api_key()?.to_owned();
    let endpoint = settings
        .weather_endpoint()
        .inspect_err(|error| warn!(error = %error, "weather endpoint misconfigured"))
        .ok()?;
    let source = OpenWeatherHttpSource::new(endpoint, Some(api_key), settings.weather_timeout())
        .inspect_err(|error| warn!(error = %error, "could not build weather client"))
        .ok()?;
    let mut service = WeatherService::new(Arc::new(source));
    // Failures are already logged by the service.
    service.refresh(location).await.ok().cloned()
}
