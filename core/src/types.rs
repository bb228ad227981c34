//! Domain types for rate lookups.
//!
//! # Design
//! `CurrencyRate` and `ProviderError` mirror the provider's JSON bodies but
//! are defined independently from the mock-provider crate; integration tests
//! catch schema drift between the two.
//!
//! Rates are `Decimal`, decoded from and encoded to the JSON number text
//! without passing through `f64`, so the value the provider printed is the
//! value the caller gets back. They live in a `BTreeMap`, which keeps every code and
//! serializes them in a stable order.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Caller input for a single lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuery {
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl RateQuery {
    pub fn new(base: impl Into<String>, target: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            base: base.into(),
            target: target.into(),
            timestamp,
        }
    }

    /// A query for the latest published rates.
    pub fn latest(base: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(base, target, None)
    }

    /// A query for the rates published on `timestamp`.
    pub fn on(base: impl Into<String>, target: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(base, target, Some(timestamp.into()))
    }

    /// The effective timestamp. A blank value means "latest", same as none.
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// The two URLs derived from a query once it has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedRequest {
    pub echo_url: String,
    pub upstream_url: String,
}

/// Rates relative to `base` as published on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub base: String,
    pub date: String,
    pub rates: BTreeMap<String, Decimal>,
}

/// An error reported by the provider in its response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
}

/// The single outcome of a lookup.
///
/// Serialized with a `status` tag (`success`, `client_error`,
/// `upstream_error`) and camelCase fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RateResult {
    Success {
        echo_url: String,
        upstream_url: String,
        status_message: String,
        rate: CurrencyRate,
    },
    /// The query was rejected before the provider was contacted.
    ClientError { echo_url: String, error_message: String },
    UpstreamError {
        echo_url: String,
        upstream_url: String,
        error_message: String,
    },
}

impl RateResult {
    pub fn echo_url(&self) -> &str {
        match self {
            RateResult::Success { echo_url, .. }
            | RateResult::ClientError { echo_url, .. }
            | RateResult::UpstreamError { echo_url, .. } => echo_url,
        }
    }

    pub fn upstream_url(&self) -> Option<&str> {
        match self {
            RateResult::Success { upstream_url, .. } | RateResult::UpstreamError { upstream_url, .. } => {
                Some(upstream_url)
            }
            RateResult::ClientError { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RateResult::Success { .. } => None,
            RateResult::ClientError { error_message, .. } | RateResult::UpstreamError { error_message, .. } => {
                Some(error_message)
            }
        }
    }

    pub fn rate(&self) -> Option<&CurrencyRate> {
        match self {
            RateResult::Success { rate, .. } => Some(rate),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RateResult::Success { .. })
    }
}
