mod aggregate;
mod combine;
mod config;
mod error;
mod normalize;
mod smhi;
mod stations;
mod types;
mod weather_data;

pub use error::SmhiError;
pub use smhi::*;

pub use aggregate::{monthly_means, monthly_means_with, UnknownMonths};
pub use combine::combine;
pub use config::{SmhiConfig, DEFAULT_BASE_URL, MAJOR_CITIES};
pub use normalize::normalize;

pub use types::comparison::*;
pub use types::month::{Month, MonthKey, MonthParseError};
pub use types::monthly::*;
pub use types::observation::*;
pub use types::source::Source;
pub use types::station::{ResolvedStation, Station};

pub use stations::directory::{parse_directory, HttpStationDirectory, StationDirectory};
pub use stations::resolve_station::{
    find_station, search_stations, StationResolver, DEFAULT_SEARCH_LIMIT,
};

pub use weather_data::downloader::Downloader;
pub use weather_data::fetcher::{EmptyReason, SeriesFetch, SeriesFetcher, RECENT_WINDOW_DAYS};
pub use weather_data::historical_csv::{parse_historical_csv, HistoricalCsvFetcher};
pub use weather_data::monthly_csv::{parse_monthly_csv, MonthlyCsvFetcher, EXACT_HEADER_PREFIX};
pub use weather_data::recent_json::{parse_recent_json, RecentJsonFetcher};

pub use stations::error::ResolveStationError;
pub use weather_data::error::WeatherDataError;
