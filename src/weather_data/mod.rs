pub mod csv_layout;
pub mod downloader;
pub mod error;
pub mod fetcher;
pub mod historical_csv;
pub mod monthly_csv;
pub mod recent_json;
