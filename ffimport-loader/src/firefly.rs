//! Firefly III transaction API.

use std::future::Future;

use anyhow::{Context, Result};
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::config::FireflySection;
use crate::transaction::TransactionGroupRequest;

#[derive(Debug, Error)]
pub enum BatchSubmissionError {
    #[error("ledger API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("ledger API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("encode batch payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Remote ledger that accepts transaction groups.
pub trait LedgerApi {
    /// Create one transaction group. Any error means nothing in the batch is
    /// assumed stored.
    fn create_transactions(
        &self,
        request: &TransactionGroupRequest<'_>,
    ) -> impl Future<Output = Result<(), BatchSubmissionError>> + Send;
}

/// HTTP client for a Firefly III instance.
#[derive(Debug, Clone)]
pub struct FireflyClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl FireflyClient {
    pub fn new(cfg: &FireflySection) -> Result<Self> {
        Self::with_builder(cfg, reqwest::Client::builder())
    }

    /// Like [`FireflyClient::new`] on top of a caller-tuned builder (proxy, TLS roots).
    pub fn with_builder(cfg: &FireflySection, builder: reqwest::ClientBuilder) -> Result<Self> {
        let endpoint = cfg.transactions_endpoint()?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", cfg.token.trim()))
            .context("firefly.token contains characters not allowed in a header")?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        // Without this Accept value some Firefly versions answer with an HTML redirect.
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.api+json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = builder
            .default_headers(headers)
            .timeout(cfg.timeout())
            .build()
            .context("build HTTP client")?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl LedgerApi for FireflyClient {
    async fn create_transactions(
        &self,
        request: &TransactionGroupRequest<'_>,
    ) -> Result<(), BatchSubmissionError> {
        let body = serde_json::to_vec(request)?;

        let resp = self.http.post(self.endpoint.clone()).body(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BatchSubmissionError::Status { status, body });
        }

        // Created records are not inspected beyond the status code.
        debug!("ledger API accepted {} transactions ({status})", request.transactions.len());
        Ok(())
    }
}
