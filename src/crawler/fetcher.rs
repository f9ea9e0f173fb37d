//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients, one per configured proxy
//! - Rejecting hosts outside the allow-list
//! - Throttling through the scheduler
//! - Rotating user agents and proxies between attempts
//! - Retry with exponential backoff for transient failures

use crate::config::{Config, RetryConfig};
use crate::crawler::parser::Document;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::task::CrawlTask;
use crate::url::{extract_domain, is_allowed_host};
use crate::{FetchError, KinoError};
use async_trait::async_trait;
use reqwest::{header::USER_AGENT, redirect::Policy, Client, Proxy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Transport collaborator used by the coordinator
///
/// Implementations own retries: an `Err` is terminal for the task.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, task: &CrawlTask) -> Result<Document, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `timeout` - Per-request timeout
/// * `proxy` - Optional proxy URL all traffic is sent through
///
/// # Example
///
/// ```
/// use kino_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(15), None).unwrap();
/// ```
pub fn build_http_client(timeout: Duration, proxy: Option<&str>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    builder.build()
}

/// Fetcher backed by `reqwest`
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx | Return the body |
/// | Status listed in `retry.http-codes` | Retry with backoff |
/// | Other non-2xx status | Fail immediately |
/// | Timeout | Retry with backoff |
/// | Connection / other network error | Retry with backoff |
/// | Host outside the allow-list | Fail without a request |
///
/// Every attempt goes through the scheduler and picks the next user agent
/// and the next client (proxy) in rotation.
pub struct HttpFetcher {
    clients: Vec<Client>,
    user_agents: Vec<String>,
    scheduler: Scheduler,
    retry: RetryConfig,
    allowed: Vec<String>,
    rotation: AtomicUsize,
}

impl HttpFetcher {
    /// Builds a fetcher from the full configuration
    pub fn new(config: &Config) -> Result<Self, KinoError> {
        let timeout = config.crawler.request_timeout();

        let clients = if config.user_agent.proxies.is_empty() {
            vec![build_http_client(timeout, None)?]
        } else {
            config
                .user_agent
                .proxies
                .iter()
                .map(|proxy| build_http_client(timeout, Some(proxy)))
                .collect::<Result<Vec<_>, _>>()?
        };

        tracing::debug!(
            "HTTP fetcher ready: {} client(s), {} user agent(s)",
            clients.len(),
            config.user_agent.pool.len()
        );

        Ok(Self {
            clients,
            user_agents: config.user_agent.pool.clone(),
            scheduler: Scheduler::new(&config.crawler),
            retry: config.retry.clone(),
            allowed: config.sites.allowed_domains.clone(),
            rotation: AtomicUsize::new(0),
        })
    }

    /// The scheduler throttling this fetcher
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Picks the client and user agent for the next attempt
    fn rotate(&self) -> (&Client, Option<&str>) {
        let turn = self.rotation.fetch_add(1, Ordering::Relaxed);
        let client = &self.clients[turn % self.clients.len()];
        let user_agent = if self.user_agents.is_empty() {
            None
        } else {
            Some(self.user_agents[turn % self.user_agents.len()].as_str())
        };
        (client, user_agent)
    }

    async fn attempt(&self, task: &CrawlTask) -> Result<Document, FetchError> {
        let (client, user_agent) = self.rotate();
        let url = task.url.as_str();

        let mut request = client.get(task.url.clone());
        if let Some(user_agent) = user_agent {
            request = request.header(USER_AGENT, user_agent);
        }

        let response = request.send().await.map_err(|e| classify(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| classify(url, e))?;
        Ok(Document::new(final_url, body))
    }

    fn is_retryable(&self, error: &FetchError) -> bool {
        match error {
            FetchError::Http { status, .. } => self.retry.http_codes.contains(status),
            FetchError::Timeout { .. } | FetchError::Network { .. } => true,
            FetchError::OffSite { .. } => false,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, task: &CrawlTask) -> Result<Document, FetchError> {
        let off_site = || FetchError::OffSite {
            url: task.url.to_string(),
        };
        if !is_allowed_host(&task.url, &self.allowed) {
            return Err(off_site());
        }
        let host = extract_domain(&task.url).ok_or_else(off_site)?;

        let mut retries = 0;
        loop {
            let result = {
                let _permits = self.scheduler.acquire(&host).await.ok_or_else(|| {
                    FetchError::Network {
                        url: task.url.to_string(),
                        message: "request scheduler closed".to_string(),
                    }
                })?;
                tracing::debug!("GET {} ({})", task.url, task.stage);
                self.attempt(task).await
            };

            match result {
                Ok(document) => return Ok(document),
                Err(error) if retries < self.retry.times && self.is_retryable(&error) => {
                    let backoff = self.retry.backoff_for(retries);
                    retries += 1;
                    tracing::warn!(
                        "{} (retry {}/{} in {:?})",
                        error,
                        retries,
                        self.retry.times,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
