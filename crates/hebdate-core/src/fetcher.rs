use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::types::ConverterResponse;
use crate::{Error, HebrewDate, Result};

/// Hebcal converter endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.hebcal.com/converter";

/// Hard cutoff for a converter request; not retried.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the Gregorian-to-Hebrew converter
pub struct Fetcher {
    client: Client,
    base_url: String,
}

impl Fetcher {
    /// Creates a new fetcher against `base_url` with the default 10 second timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a new fetcher with a custom request timeout (primarily for tests)
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hebdate/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Base endpoint requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Converts a Gregorian date, issuing
    /// `GET <base>?cfg=json&date=YYYY-MM-DD&g2h=1`.
    ///
    /// Fails with [`Error::Network`] on transport problems,
    /// [`Error::HttpStatus`] for anything but `200 OK`, and
    /// [`Error::InvalidResponse`] when the body is not a converter payload.
    pub async fn convert(&self, date: NaiveDate) -> Result<HebrewDate> {
        let date = date.format("%Y-%m-%d").to_string();
        debug!("Requesting conversion of {} from {}", date, self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("cfg", "json"), ("date", date.as_str()), ("g2h", "1")])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let converted = ConverterResponse::parse(&body)?.into_hebrew_date()?;

        info!("Converted {} to {}", date, converted.transliterated);
        Ok(converted)
    }
}

// Note: Default is not implemented as Fetcher::new() can fail.
