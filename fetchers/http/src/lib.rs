use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("HTTP GET request for {url} failed with status: {status}")]
    Status { url: Url, status: StatusCode },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// True when the request hit the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(err) if err.is_timeout())
    }
}

/// Downloads a single document over HTTP(S).
pub struct HttpFetcher {
    http_client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a client whose timeout covers the whole exchange, from
    /// connecting until the last body byte. `None` disables it.
    pub fn create(timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http_client: builder.build()?,
        })
    }

    /// Sends a `GET` and buffers the full response body.
    ///
    /// Any non-2xx status is an error. The response is dropped, and its
    /// connection released, on every return path.
    pub async fn fetch(&self, url: &str) -> Result<Bytes, Error> {
        let url: Url = url.parse()?;
        log::info!("Fetching URL: {}", url);

        let res = self.http_client.get(url.clone()).send().await?;
        if !res.status().is_success() {
            return Err(Error::Status {
                url,
                status: res.status(),
            });
        }

        let body = res.bytes().await?;
        log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
