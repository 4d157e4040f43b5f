use crate::types::source::Source;
use crate::weather_data::error::WeatherDataError;
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;

/// Fetches raw observation documents from the SMHI API. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    base_url: String,
}

impl Downloader {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn url_for(&self, source: Source, station_id: i64) -> String {
        format!("{}/{}", self.base_url, source.data_path(station_id))
    }

    /// Downloads the document for `source` and returns its body as text.
    pub async fn download(
        &self,
        source: Source,
        station_id: i64,
        timeout: Duration,
    ) -> Result<String, WeatherDataError> {
        let url = self.url_for(source, station_id);
        info!("Downloading {} data for station {} from {}", source, station_id, url);

        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!("Timed out after {:?} fetching {}", timeout, url);
                }
                WeatherDataError::NetworkRequest(url.clone(), e)
            })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    WeatherDataError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    WeatherDataError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.clone(), e))?;
        info!(
            "Downloaded {} bytes of {} data for station {}",
            body.len(),
            source,
            station_id
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accepts connections and never answers them.
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_url_for_trims_trailing_slash() {
        let downloader = Downloader::new(Client::new(), "http://example.test/api/");
        assert_eq!(
            downloader.url_for(Source::MonthlyCsv, 97400),
            "http://example.test/api/parameter/1/station/97400/period/latest-months/data.csv"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 on localhost (discard) is not expected to run an HTTP server.
        let downloader = Downloader::new(Client::new(), "http://127.0.0.1:9");
        let result = downloader
            .download(Source::RecentJson, 1, Duration::from_secs(2))
            .await;
        assert!(matches!(
            result,
            Err(WeatherDataError::NetworkRequest(_, _))
        ));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let downloader = Downloader::new(Client::new(), &silent_server().await);
        let started = std::time::Instant::now();
        let result = downloader
            .download(Source::MonthlyCsv, 97400, Duration::from_millis(300))
            .await;
        assert!(matches!(
            &result,
            Err(WeatherDataError::NetworkRequest(url, e))
                if e.is_timeout() && url.ends_with("/station/97400/period/latest-months/data.csv")
        ));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
