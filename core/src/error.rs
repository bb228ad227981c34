//! Error types for the rate lookup pipeline.
//!
//! # Design
//! None of these escape `CurrencyRateService::get_rates`: validation and
//! format errors become `RateResult::ClientError`, transport and parse errors
//! become `RateResult::UpstreamError`. Their `Display` output is the message
//! the caller eventually sees, so it is written for humans.
//!
//! `TransportError::Status` keeps the response body because the provider
//! sends a structured error payload alongside 4xx/5xx statuses.

use std::fmt;

use thiserror::Error;

/// Which side of the currency pair a validation message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyField {
    Base,
    Target,
}

impl fmt::Display for CurrencyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyField::Base => write!(f, "base"),
            CurrencyField::Target => write!(f, "target"),
        }
    }
}

/// Caller input that cannot be turned into an upstream request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} currency is required")]
    MissingCurrency { field: CurrencyField },

    #[error("{field} currency '{code}' must be three uppercase letters")]
    MalformedCurrency { field: CurrencyField, code: String },

    #[error("{field} currency '{code}' is not supported")]
    UnsupportedCurrency { field: CurrencyField, code: String },

    #[error("base and target currencies must differ, both are '{code}'")]
    SameCurrency { code: String },

    #[error("invalid timestamp '{value}': expected a date formatted as YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("invalid timestamp '{value}': date is in the future")]
    FutureDate { value: String },

    #[error("query parameter '{name}' was given more than once")]
    RepeatedParameter { name: &'static str },
}

/// The timestamp could not be parsed while composing the upstream URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("timestamp '{value}' does not match format {format}: {source}")]
pub struct FormatError {
    pub value: String,
    pub format: &'static str,
    #[source]
    pub source: chrono::ParseError,
}

impl From<FormatError> for ValidationError {
    fn from(e: FormatError) -> Self {
        ValidationError::InvalidDate { value: e.value }
    }
}

/// Failure talking to the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The provider answered with a non-2xx status.
    #[error("upstream returned HTTP {status}")]
    Status { status: u16, body: String },

    /// No usable response: connection refused, DNS, timeout, bad URL.
    #[error("upstream request failed: {message}")]
    Io { message: String },
}

impl TransportError {
    /// Body received before the failure, if the provider sent one.
    pub fn partial_body(&self) -> Option<&str> {
        match self {
            TransportError::Status { body, .. } if !body.trim().is_empty() => Some(body),
            _ => None,
        }
    }
}

/// A response body did not match the expected payload schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed rate payload: {0}")]
    RatePayload(String),

    #[error("malformed provider error payload: {0}")]
    ErrorPayload(String),
}

/// Invalid service configuration, reported once at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {name} url '{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{name} url '{value}' cannot be used as a base for request paths")]
    NotABase { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_field() {
        let err = ValidationError::MissingCurrency {
            field: CurrencyField::Base,
        };
        assert_eq!(err.to_string(), "base currency is required");

        let err = ValidationError::MalformedCurrency {
            field: CurrencyField::Target,
            code: "eur".to_string(),
        };
        assert_eq!(err.to_string(), "target currency 'eur' must be three uppercase letters");
    }

    #[test]
    fn format_error_converts_to_invalid_date() {
        let source = chrono::NaiveDate::parse_from_str("nope", "%Y-%m-%d").unwrap_err();
        let err = FormatError {
            value: "nope".to_string(),
            format: "%Y-%m-%d",
            source,
        };
        let validation: ValidationError = err.into();
        assert_eq!(
            validation,
            ValidationError::InvalidDate {
                value: "nope".to_string()
            }
        );
    }

    #[test]
    fn partial_body_ignores_blank_bodies() {
        let err = TransportError::Status {
            status: 502,
            body: "  \n".to_string(),
        };
        assert_eq!(err.partial_body(), None);

        let err = TransportError::Status {
            status: 400,
            body: r#"{"error":"bad"}"#.to_string(),
        };
        assert_eq!(err.partial_body(), Some(r#"{"error":"bad"}"#));

        let err = TransportError::Io {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.partial_body(), None);
    }
}
