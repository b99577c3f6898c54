//! HTTP client seam for file fetches.

use std::io::Read;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::error::VdmError;

/// Response to a GET: status plus a streaming body.
pub struct HttpResponse {
    pub status: u16,
    pub body: Box<dyn Read>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP backends. Tests use a scripted client that records
/// requests without touching the network.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse, VdmError>;
}

/// Blocking `reqwest` client.
///
/// No request timeout is set: a transfer runs until it completes or fails.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, VdmError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("vdm/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()
            .map_err(VdmError::HttpClient)?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    #[instrument(skip(self))]
    fn get(&self, url: &str) -> Result<HttpResponse, VdmError> {
        let response = self.client.get(url).send().map_err(|err| VdmError::Http {
            url: url.to_string(),
            source: err,
        })?;
        let status = response.status().as_u16();
        debug!(status, "response received");
        Ok(HttpResponse {
            status,
            body: Box::new(response),
        })
    }
}
