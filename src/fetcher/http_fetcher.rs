use std::error::Error as _;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;

use crate::app::Result;
use crate::config::FetchConfig;
use crate::fetcher::Fetcher;

const FEED_ACCEPT: &str = "application/rss+xml, application/xml, text/xml, */*";

/// Client settings for one kind of run (the aggregation and snapshot runs
/// use different timeouts and user agents).
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub allow_invalid_certs: bool,
}

impl From<&FetchConfig> for FetchOptions {
    fn from(config: &FetchConfig) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
            user_agent: config.user_agent.clone(),
            allow_invalid_certs: config.allow_invalid_certs,
        }
    }
}

pub struct HttpFetcher {
    client: Client,
    /// Built only when the operator opted into the insecure retry.
    insecure_client: Option<Client>,
}

impl HttpFetcher {
    pub fn new(options: FetchOptions) -> Self {
        let client = Self::build_client(&options, false);
        let insecure_client = options
            .allow_invalid_certs
            .then(|| Self::build_client(&options, true));

        Self {
            client,
            insecure_client,
        }
    }

    fn build_client(options: &FetchOptions, accept_invalid_certs: bool) -> Client {
        Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(options.user_agent.clone())
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .expect("failed to build HTTP client")
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(FEED_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers
    }

    async fn get(&self, client: &Client, url: &str) -> Result<Vec<u8>> {
        let response = client.get(url).headers(Self::headers()).send().await?;
        response.error_for_status_ref()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        // Registries accumulate typos; reject junk before issuing a request.
        url::Url::parse(url)?;

        match self.get(&self.client, url).await {
            Ok(body) => Ok(body),
            Err(crate::app::IzvorError::Http(err)) => {
                if let Some(insecure) = &self.insecure_client {
                    if is_certificate_error(&err) {
                        tracing::warn!(
                            url,
                            "TLS certificate verification failed, retrying once without \
                             verification"
                        );
                        return self.get(insecure, url).await;
                    }
                }
                Err(err.into())
            }
            Err(other) => Err(other),
        }
    }
}

/// Whether a reqwest failure was a TLS certificate problem, as opposed to a
/// timeout, DNS failure, or refused connection.
fn is_certificate_error(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string().to_ascii_lowercase();
        if message.contains("certificate") || message.contains("self-signed") {
            return true;
        }
        source = cause.source();
    }
    false
}
