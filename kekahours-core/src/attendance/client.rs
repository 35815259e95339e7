//! HTTP client for the Keka attendance summary API
//!
//! One authenticated GET per refresh cycle. No retries: a failed cycle is
//! simply superseded by the next one.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// Fixed endpoint path below the tenant base URL.
pub const SUMMARY_PATH: &str = "/k/attendance/api/mytime/attendance/summary/";

/// Response body: a list of daily attendance records.
#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

/// HTTP client for the attendance summary endpoint
pub struct AttendanceClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AttendanceClient {
    /// Create a new client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// The full summary endpoint URL.
    pub fn summary_url(&self) -> String {
        format!("{}{}", self.base_url, SUMMARY_PATH)
    }

    /// Fetch the day records for the authenticated employee.
    ///
    /// The bearer token is supplied per call; callers re-read it on every
    /// refresh cycle.
    pub async fn fetch_day_records(&self, token: &str) -> Result<Vec<serde_json::Value>> {
        let url = self.summary_url();

        let response = self
            .http_client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Attendance API returned an error");
            return Err(Error::Api {
                status: status.as_u16(),
            });
        }

        let body: SummaryResponse = response.json().await?;
        Ok(body.data)
    }
}
