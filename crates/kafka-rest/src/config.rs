use crate::error::{Error, Result};
use crate::http::HttpRestClient;
use clap::Parser;
use std::time::Duration;

/// Connection settings for the Kafka REST Proxy.
#[derive(Debug, Clone, Parser)]
pub struct ClientConfig {
    /// Proxy base URL; user info in the URL is sent as basic auth
    #[clap(long, env = "KAFKA_REST_URL", default_value = "http://localhost:8082")]
    pub proxy_url: String,
    /// Timeout of a single HTTP request in seconds. Must exceed the fetch
    /// timeout used by consumers, or long polls are cut short.
    #[clap(long, default_value_t = 60)]
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: "http://localhost:8082".to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl ClientConfig {
    pub fn build(&self) -> Result<HttpRestClient> {
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()?;
        HttpRestClient::with_client(client, &self.proxy_url)
    }
}
