use reqwest::Url;
use tracing::{debug, trace};

use crate::config::lookup_config::LookupConfig;
use crate::core::errors::{LookupError, Result};
use crate::core::models::lookup_context::LookupContext;
use crate::core::traits::transport::{QueryParams, Transport};

/// Keyserver transport over HTTP(S) using a pooled reqwest client.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    max_response_bytes: usize,
}

/// Build a reqwest client from the lookup settings.
fn build_client(config: &LookupConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.connect_timeout() {
        builder = builder.connect_timeout(timeout);
    }
    builder.build().map_err(|e| LookupError::Transport {
        reason: format!("cannot prepare HTTP client: {e}"),
    })
}

impl HttpTransport {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        Self::with_client(config, build_client(config)?)
    }

    /// Use an existing client, e.g. one shared with the rest of an application.
    pub fn with_client(config: &LookupConfig, client: reqwest::Client) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client,
            base_url: config.parsed_url()?,
            max_response_bytes: config.max_response_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The base URL with its query replaced by `params`.
    pub fn request_url(&self, params: &QueryParams) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().clear().extend_pairs(params);
        url
    }

    async fn fetch(&self, url: Url) -> Result<String> {
        let mut resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Transport {
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(LookupError::HttpStatus {
                status: resp.status().as_u16(),
            });
        }

        // Read at most max_response_bytes; the rest of the body is never pulled.
        let mut body = Vec::with_capacity(self.max_response_bytes.min(16 * 1024));
        while body.len() < self.max_response_bytes {
            let chunk = resp.chunk().await.map_err(|e| LookupError::Transport {
                reason: format!("cannot read response from keyserver: {e}"),
            })?;
            let Some(chunk) = chunk else { break };
            let take = chunk.len().min(self.max_response_bytes - body.len());
            body.extend_from_slice(&chunk[..take]);
        }

        trace!(bytes = body.len(), "read keyserver response");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl Transport for HttpTransport {
    async fn get(&self, ctx: &LookupContext, params: &QueryParams) -> Result<String> {
        let url = self.request_url(params);
        debug!(op = params.get("op").map(String::as_str), "keyserver request");
        trace!(%url, "keyserver request url");
        ctx.run(self.fetch(url)).await
    }
}
