pub mod models;

use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tracing::debug;

use crate::{config::Config, error::WeatherError};

use self::models::{ForecastResponse, WeatherSnapshot};

/// Client for an Open-Meteo-compatible weather provider.
///
/// Every call is bounded by the configured timeout so an unresponsive
/// provider cannot hang a decision. No caching and no retries here — retry
/// policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl WeatherClient {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.weather_base_url,
            Duration::from_secs(config.weather_timeout_secs),
        )
    }

    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
                timeout,
            }),
        }
    }

    /// Fetches current outdoor conditions for a coordinate.
    pub async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/v1/forecast", self.inner.base_url);
        debug!(latitude, longitude, url = %url, "Fetching current weather");

        let response = self
            .inner
            .http
            .get(&url)
            .timeout(self.inner.timeout)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", "temperature_2m,weather_code".to_owned()),
                ("timeformat", "unixtime".to_owned()),
            ])
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let response = response
            .error_for_status()
            .map_err(|e| WeatherError::Unavailable(e.to_string()))?;

        let forecast = response
            .json::<ForecastResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WeatherError::Timeout(self.inner.timeout)
                } else {
                    WeatherError::InvalidResponse(e.to_string())
                }
            })?;

        WeatherSnapshot::try_from(forecast)
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> WeatherError {
        if e.is_timeout() {
            WeatherError::Timeout(self.inner.timeout)
        } else {
            WeatherError::Unavailable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::WeatherError;

    #[tokio::test]
    async fn unroutable_provider_is_unavailable() {
        // Port 1 on localhost refuses connections immediately
        let client = WeatherClient::new("http://127.0.0.1:1", Duration::from_secs(2));
        let err = client.current(52.52, 13.4).await.unwrap_err();
        assert!(matches!(err, WeatherError::Unavailable(_)));
    }

    #[test]
    fn trailing_slash_in_base_url_is_normalized() {
        let client = WeatherClient::new("http://example.com/", Duration::from_secs(1));
        assert_eq!(client.inner.base_url, "http://example.com");
    }
}
