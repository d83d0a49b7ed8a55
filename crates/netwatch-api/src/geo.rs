// IP geolocation client (ip-api.com compatible).
//
// One GET per address against `{base}/json/{address}`. The service always
// answers HTTP 200 with a `status` field; anything other than `"success"`
// is surfaced as `Error::LookupFailed`.

use std::fmt;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw geolocation response body.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoResponse {
    pub status: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Failure reason, present when `status` is `"fail"`.
    #[serde(default)]
    pub message: Option<String>,
}

/// A resolved location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLocation {
    pub city: String,
    pub country: String,
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

impl TryFrom<GeoResponse> for GeoLocation {
    type Error = Error;

    fn try_from(resp: GeoResponse) -> Result<Self, Self::Error> {
        if resp.status != "success" {
            return Err(Error::LookupFailed {
                message: resp
                    .message
                    .unwrap_or_else(|| format!("status '{}'", resp.status)),
            });
        }
        match (resp.city, resp.country) {
            (Some(city), Some(country)) => Ok(Self { city, country }),
            _ => Err(Error::LookupFailed {
                message: "response is missing city or country".into(),
            }),
        }
    }
}

/// HTTP client for the geolocation service.
pub struct GeoClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GeoClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Build the lookup URL: `{base}/json/{address}`
    pub(crate) fn lookup_url(&self, address: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/json/{address}",
            self.base_url.as_str().trim_end_matches('/')
        );
        Ok(Url::parse(&full)?)
    }

    /// Look up the location of `address`.
    pub async fn lookup(&self, address: &str) -> Result<GeoLocation, Error> {
        let url = self.lookup_url(address)?;
        debug!(%url, "geolocation lookup");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let parsed: GeoResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;
        GeoLocation::try_from(parsed)
    }
}
