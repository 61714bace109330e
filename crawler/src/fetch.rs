use anyhow::Result;
use reqwest::{Client, StatusCode, Url};
use std::future::Future;

/// Retrieves page bodies. Failures are reported as `None` and never escape.
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Option<String>>;
}

/// Plain HTTP GET; only a `200 OK` body counts as a successful fetch.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Option<String> {
        let resp = match self.client.get(url.clone()).send().await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!(%url, error = %err, "failed to reach url");
                return None;
            }
        };
        if resp.status() != StatusCode::OK {
            tracing::warn!(%url, status = %resp.status(), "unexpected status");
            return None;
        }
        match resp.text().await {
            Ok(body) => {
                tracing::debug!(%url, bytes = body.len(), "fetched page");
                Some(body)
            }
            Err(err) => {
                tracing::warn!(%url, error = %err, "failed to read body");
                None
            }
        }
    }
}
