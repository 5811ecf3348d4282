use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;

/// Where scraped documents come from. The HTTP implementation is the only
/// one used in production; tests plug in canned documents.
pub trait DocumentSource {
    fn fetch_document(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Blocking HTTP fetcher. One GET per call, no retries.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let mut builder = Client::builder().timeout(config.timeout());
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl DocumentSource for HttpFetcher {
    fn fetch_document(&self, url: &str) -> Result<String, ScrapeError> {
        info!("Fetching {}", url);

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response.bytes()?;
        debug!(url, bytes = bytes.len(), "Downloaded document");
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}
