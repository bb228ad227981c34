//! Builds the echo URL and the provider URL for a query.
//!
//! # Design
//! Both base URLs are parsed once in `UrlComposer::new`, so composing at
//! request time cannot hit a configuration error. `echo_url` never fails;
//! `upstream_url` fails only when the timestamp is not a date.

use chrono::NaiveDate;
use url::Url;

use crate::error::{ConfigError, FormatError};
use crate::types::RateQuery;

/// Format callers use for `timestamp`.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format the provider expects in the dated endpoint path.
pub const PROVIDER_DATE_FORMAT: &str = "%Y-%m-%d";

const LATEST_ENDPOINT: &str = "latest";
const RATES_ENDPOINT: &str = "rates";

/// Parse a caller-supplied timestamp.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDate, FormatError> {
    NaiveDate::parse_from_str(raw, INPUT_DATE_FORMAT).map_err(|source| FormatError {
        value: raw.to_string(),
        format: INPUT_DATE_FORMAT,
        source,
    })
}

#[derive(Debug, Clone)]
pub struct UrlComposer {
    echo_base: Url,
    provider_base: Url,
    access_key: Option<String>,
}

impl UrlComposer {
    /// `echo_base` is where this service is reachable (e.g.
    /// `http://localhost:8080/api`), `provider_base` the provider's API root
    /// (e.g. `http://data.fixer.io/api`).
    pub fn new(echo_base: &str, provider_base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            echo_base: parse_base("echo", echo_base)?,
            provider_base: parse_base("provider", provider_base)?,
            access_key: None,
        })
    }

    /// Send `access_key` with every provider request. Blank keys are ignored.
    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        let key = access_key.into();
        self.access_key = (!key.trim().is_empty()).then_some(key);
        self
    }

    /// Canonical URL of the caller's own request, built from the raw values.
    /// A blank timestamp is left out; any other value is echoed untrimmed.
    pub fn echo_url(&self, query: &RateQuery) -> String {
        let mut url = self.echo_base.clone();
        push_segment(&mut url, RATES_ENDPOINT);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("base", &query.base);
            pairs.append_pair("target", &query.target);
            if let Some(timestamp) = query.timestamp.as_deref().filter(|t| !t.trim().is_empty()) {
                pairs.append_pair("timestamp", timestamp);
            }
        }
        url.into()
    }

    /// Provider URL: `/latest` without a timestamp, `/{date}` with one.
    ///
    /// `base` and `symbols` are only sent when non-empty.
    pub fn upstream_url(&self, query: &RateQuery) -> Result<String, FormatError> {
        let endpoint = match query.timestamp() {
            Some(raw) => parse_timestamp(raw)?.format(PROVIDER_DATE_FORMAT).to_string(),
            None => LATEST_ENDPOINT.to_string(),
        };

        let mut url = self.provider_base.clone();
        push_segment(&mut url, &endpoint);

        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if let Some(key) = &self.access_key {
            pairs.push(("access_key", key.as_str()));
        }
        if !query.base.is_empty() {
            pairs.push(("base", query.base.as_str()));
        }
        if !query.target.is_empty() {
            pairs.push(("symbols", query.target.as_str()));
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url.into())
    }
}

fn parse_base(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::NotABase {
            name,
            value: value.to_string(),
        });
    }
    Ok(url)
}

fn push_segment(url: &mut Url, segment: &str) {
    // parse_base rejects URLs without path segments.
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
}
