//! Admission gate: consults the external decision service at connect time.
//!
//! The decision service is an external collaborator that, given request
//! metadata, returns one of allow/deny/challenge. [`AdmissionGate`] is
//! the capability seam — the production implementation is
//! [`HttpAdmissionGate`], tests inject fakes. Absence of a gate (no
//! `ADMISSION_URL` configured) admits every connection unconditionally.

use std::fmt;

use axum::http::HeaderMap;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionDecision {
    /// Complete the handshake and admit the connection.
    Allow,
    /// Reject with a "too many requests" close.
    Deny,
    /// Reject with a "forbidden" close.
    Challenge,
}

/// Request metadata forwarded to the decision service.
#[derive(Debug, Clone, Serialize)]
pub struct RequestMeta {
    /// The client's `User-Agent` header, or a placeholder when absent.
    pub user_agent: String,
}

impl RequestMeta {
    /// Placeholder substituted when the client sent no `User-Agent`.
    pub const UNKNOWN_USER_AGENT: &'static str = "unknown";

    /// Extracts metadata from the upgrade request headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let user_agent = headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(Self::UNKNOWN_USER_AGENT)
            .to_string();
        Self { user_agent }
    }
}

/// Capability that decides whether a connection may be admitted.
pub trait AdmissionGate: Send + Sync + fmt::Debug {
    /// Evaluates request metadata against the decision service.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::AdmissionUnavailable`] when the service
    /// cannot be reached or returns an unusable response. The caller
    /// bounds this future with a timeout; either outcome closes the
    /// connection with an internal-error code without admitting it.
    fn evaluate<'a>(
        &'a self,
        meta: &'a RequestMeta,
    ) -> BoxFuture<'a, Result<AdmissionDecision, RelayError>>;
}

#[derive(Debug, Deserialize)]
struct DecisionBody {
    decision: AdmissionDecision,
}

/// Decision service client speaking JSON over HTTP.
///
/// POSTs the [`RequestMeta`] to the configured endpoint and expects a
/// `{"decision": "allow" | "deny" | "challenge"}` body.
#[derive(Debug, Clone)]
pub struct HttpAdmissionGate {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAdmissionGate {
    /// Creates a gate client for the given decision service endpoint.
    #[must_use]
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

impl AdmissionGate for HttpAdmissionGate {
    fn evaluate<'a>(
        &'a self,
        meta: &'a RequestMeta,
    ) -> BoxFuture<'a, Result<AdmissionDecision, RelayError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.endpoint)
                .json(meta)
                .send()
                .await
                .map_err(|e| RelayError::AdmissionUnavailable(e.to_string()))?
                .error_for_status()
                .map_err(|e| RelayError::AdmissionUnavailable(e.to_string()))?;

            let body: DecisionBody = response
                .json()
                .await
                .map_err(|e| RelayError::AdmissionUnavailable(e.to_string()))?;

            Ok(body.decision)
        })
    }
}
