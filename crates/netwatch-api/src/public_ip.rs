// Public address client (ifconfig.me compatible): the whole plain-text
// response body is the caller's address.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// HTTP client for the public-address service.
pub struct PublicIpClient {
    http: reqwest::Client,
    url: Url,
}

impl PublicIpClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, url: Url) -> Self {
        Self { http, url }
    }

    /// Fetch this host's externally visible address.
    pub async fn fetch(&self) -> Result<String, Error> {
        debug!(url = %self.url, "public address lookup");

        let resp = self.http.get(self.url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let address = body.trim();
        if address.is_empty() {
            return Err(Error::LookupFailed {
                message: "empty response body".into(),
            });
        }
        Ok(address.to_owned())
    }
}
