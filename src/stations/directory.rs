use crate::stations::error::ResolveStationError;
use crate::types::station::{Station, StationDirectoryDocument};
use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;

const DIRECTORY_PATH: &str = "parameter/1.json";

/// Source of the full station list for the air-temperature parameter.
#[async_trait]
pub trait StationDirectory: Send + Sync {
    async fn stations(&self) -> Result<Vec<Station>, ResolveStationError>;
}

/// Downloads the station directory from the SMHI API on every call.
#[derive(Debug, Clone)]
pub struct HttpStationDirectory {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpStationDirectory {
    pub fn new(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            url: format!("{}/{}", base_url.trim_end_matches('/'), DIRECTORY_PATH),
            timeout,
        }
    }
}

#[async_trait]
impl StationDirectory for HttpStationDirectory {
    async fn stations(&self) -> Result<Vec<Station>, ResolveStationError> {
        info!("Fetching station directory from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!("Timed out after {:?} fetching {}", self.timeout, self.url);
                }
                ResolveStationError::NetworkRequest(self.url.clone(), e)
            })?;
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", self.url, e);
                return Err(if let Some(status) = e.status() {
                    ResolveStationError::HttpStatus {
                        url: self.url.clone(),
                        status,
                        source: e,
                    }
                } else {
                    ResolveStationError::NetworkRequest(self.url.clone(), e)
                });
            }
        };
        let body = response
            .bytes()
            .await
            .map_err(|e| ResolveStationError::NetworkRequest(self.url.clone(), e))?;

        let stations = parse_directory(&body)?;
        info!("Station directory lists {} stations", stations.len());
        Ok(stations)
    }
}

/// Parses the directory document. Stations keep the order the document lists them in.
pub fn parse_directory(body: &[u8]) -> Result<Vec<Station>, ResolveStationError> {
    let document: StationDirectoryDocument = serde_json::from_slice(body)?;
    Ok(document.station)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directory() {
        let body = br#"{
            "key": "1",
            "title": "Lufttemperatur",
            "station": [
                {"id": 97400, "name": "Stockholm-Observatoriekullen A", "owner": "SMHI",
                 "ownerCategory": "CLIMATE", "latitude": 59.3417, "longitude": 18.0549,
                 "height": 43.133, "active": true, "from": -2208988800000},
                {"id": 98210, "name": "Stockholm", "latitude": 59.34, "longitude": 18.05}
            ]
        }"#;
        let stations = parse_directory(body).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, 97400);
        assert_eq!(stations[0].owner_category.as_deref(), Some("CLIMATE"));
        assert!(stations[0].active);
        assert!(!stations[1].active);
        assert_eq!(stations[1].height, None);
    }

    #[test]
    fn test_parse_directory_rejects_garbage() {
        assert!(matches!(
            parse_directory(b"not json"),
            Err(ResolveStationError::JsonParse(_))
        ));
    }

    #[test]
    fn test_directory_url() {
        let directory = HttpStationDirectory::new(
            Client::new(),
            "http://example.test/api/",
            Duration::from_secs(1),
        );
        assert_eq!(directory.url, "http://example.test/api/parameter/1.json");
    }
}
