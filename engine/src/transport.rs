use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use bytes::Bytes;
use log::debug;
use reqwest::{Client, header::USER_AGENT};
use serde_json::Value;
use thiserror::Error;

use crate::config::ApiKey;

#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: Bytes,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failures below the HTTP status level.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("could not connect: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpReply, TransportError>> + Send + 'a>>;

/// The one seam between the tools and the network.
pub trait Transport: Send + Sync {
    /// POST a JSON body with bearer authentication.
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a ApiKey,
        body: &'a Value,
    ) -> TransportFuture<'a>;

    /// Unauthenticated GET, used to download generated media.
    fn get<'a>(&'a self, url: &'a str) -> TransportFuture<'a>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a ApiKey,
        body: &'a Value,
    ) -> TransportFuture<'a> {
        (**self).post_json(url, api_key, body)
    }

    fn get<'a>(&'a self, url: &'a str) -> TransportFuture<'a> {
        (**self).get(url)
    }
}

const USER_AGENT_VALUE: &str = concat!("grsai-skills/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    request_timeout: Duration,
    download_timeout: Duration,
}

impl ReqwestTransport {
    pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(request_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            request_timeout,
            download_timeout: Self::DOWNLOAD_TIMEOUT,
        }
    }

    async fn collect(resp: reqwest::Response) -> Result<HttpReply, TransportError> {
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(map_reqwest_error)?;
        Ok(HttpReply { status, body })
    }
}

impl Transport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a ApiKey,
        body: &'a Value,
    ) -> TransportFuture<'a> {
        Box::pin(async move {
            debug!("POST {url}");
            let resp = self
                .client
                .post(url)
                .timeout(self.request_timeout)
                .bearer_auth(api_key.expose())
                .json(body)
                .send()
                .await
                .map_err(map_reqwest_error)?;
            Self::collect(resp).await
        })
    }

    fn get<'a>(&'a self, url: &'a str) -> TransportFuture<'a> {
        Box::pin(async move {
            debug!("GET {url}");
            let resp = self
                .client
                .get(url)
                .timeout(self.download_timeout)
                .header(USER_AGENT, USER_AGENT_VALUE)
                .send()
                .await
                .map_err(map_reqwest_error)?;
            Self::collect(resp).await
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
