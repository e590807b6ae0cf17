//! Network boundary: raw GET/POST bodies, nothing protocol-specific.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::HttpConfig;

/// Transport trait - implement for each way of reaching a service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and return the response body
    async fn get(&self, url: &str) -> Result<String>;

    /// Send `body` to `url` with extra request headers and return the response body
    async fn post(&self, url: &str, body: String, headers: &[(&str, &str)]) -> Result<String>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed GET {}", url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            bail!("HTTP {} for GET {}: {}", status, url, body);
        }
        Ok(body)
    }

    async fn post(&self, url: &str, body: String, headers: &[(&str, &str)]) -> Result<String> {
        tracing::debug!("POST {} ({} bytes)", url, body.len());
        let mut request = self.client.post(url).body(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed POST {}", url))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            bail!("HTTP {} for POST {}: {}", status, url, response_body);
        }
        Ok(response_body)
    }
}

/// In-memory transport for tests: answers from a route table and records
/// every request it sees.
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct SentRequest {
        pub method: &'static str,
        pub url: String,
        pub body: Option<String>,
        pub headers: Vec<(String, String)>,
    }

    #[derive(Default)]
    pub struct FakeTransport {
        routes: Vec<(String, Result<String, String>)>,
        sent: Mutex<Vec<SentRequest>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Responds with `body` to any URL containing `pattern`.
        pub fn route(mut self, pattern: &str, body: &str) -> Self {
            self.routes.push((pattern.to_string(), Ok(body.to_string())));
            self
        }

        /// Fails any request whose URL contains `pattern`.
        pub fn fail(mut self, pattern: &str, message: &str) -> Self {
            self.routes.push((pattern.to_string(), Err(message.to_string())));
            self
        }

        pub fn sent(&self) -> Vec<SentRequest> {
            self.sent.lock().unwrap().clone()
        }

        pub fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }

        fn respond(&self, request: SentRequest) -> Result<String> {
            let url = request.url.clone();
            self.sent.lock().unwrap().push(request);
            match self.routes.iter().find(|(pattern, _)| url.contains(pattern.as_str())) {
                Some((_, Ok(body))) => Ok(body.clone()),
                Some((_, Err(message))) => bail!("{}", message),
                None => bail!("no route for {}", url),
            }
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str) -> Result<String> {
            self.respond(SentRequest {
                method: "GET",
                url: url.to_string(),
                body: None,
                headers: Vec::new(),
            })
        }

        async fn post(&self, url: &str, body: String, headers: &[(&str, &str)]) -> Result<String> {
            self.respond(SentRequest {
                method: "POST",
                url: url.to_string(),
                body: Some(body),
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            })
        }
    }
}
