//! Turns what the pipeline observed into exactly one `RateResult`.
//!
//! # Design
//! `Observation` separates the two ways a lookup can end. A rejected query
//! has no upstream URL by construction, so a `ClientError` can never carry
//! one. Parsing goes through typed serde bodies and fails with a named
//! `ParseError`; nothing in here panics or returns early with an error.

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ParseError, TransportError, ValidationError};
use crate::types::{ComposedRequest, CurrencyRate, ProviderError, RateResult};

/// Status message attached to every successful lookup.
pub const OK_MESSAGE: &str = "OK";

/// Everything the normalizer needs to pick a result variant.
#[derive(Debug, Clone)]
pub enum Observation {
    /// Validation failed; the provider was never contacted.
    Rejected { echo_url: String, error: ValidationError },
    /// The provider was called with `request.upstream_url`.
    Fetched {
        request: ComposedRequest,
        outcome: Result<String, TransportError>,
    },
}

pub fn normalize(observation: Observation) -> RateResult {
    match observation {
        Observation::Rejected { echo_url, error } => RateResult::ClientError {
            echo_url,
            error_message: error.to_string(),
        },
        Observation::Fetched {
            request,
            outcome: Ok(body),
        } => match parse_rate_body(&body) {
            Ok(rate) => RateResult::Success {
                echo_url: request.echo_url,
                upstream_url: request.upstream_url,
                status_message: OK_MESSAGE.to_string(),
                rate,
            },
            Err(e) => {
                warn!(upstream_url = %request.upstream_url, error = %e, "unusable rate payload");
                upstream_error(request, e.to_string())
            }
        },
        Observation::Fetched {
            request,
            outcome: Err(err),
        } => {
            let message = match err.partial_body().map(parse_error_body) {
                Some(Ok(provider)) => {
                    info!(code = ?provider.code, message = %provider.message, "provider reported an error");
                    provider.message
                }
                Some(Err(parse_err)) => {
                    warn!(error = %err, parse_error = %parse_err, "unrecognized provider error body");
                    err.to_string()
                }
                None => {
                    warn!(error = %err, "upstream call failed");
                    err.to_string()
                }
            };
            upstream_error(request, message)
        }
    }
}

fn upstream_error(request: ComposedRequest, error_message: String) -> RateResult {
    RateResult::UpstreamError {
        echo_url: request.echo_url,
        upstream_url: request.upstream_url,
        error_message,
    }
}

/// Parse a successful provider body.
pub fn parse_rate_body(body: &str) -> Result<CurrencyRate, ParseError> {
    serde_json::from_str(body).map_err(|e| ParseError::RatePayload(e.to_string()))
}

/// Parse the error body sent with a failed request.
///
/// Accepts both `{"error": "message", "code": 202}` and the nested form
/// `{"error": {"code": 202, "type": "invalid_currency_codes", "info": "..."}}`.
pub fn parse_error_body(body: &str) -> Result<ProviderError, ParseError> {
    let raw: ErrorBody = serde_json::from_str(body).map_err(|e| ParseError::ErrorPayload(e.to_string()))?;
    match raw.error {
        Value::String(message) => Ok(ProviderError { code: raw.code, message }),
        Value::Object(detail) => {
            let text = |key: &str| detail.get(key).and_then(Value::as_str).map(str::to_string);
            Ok(ProviderError {
                code: detail.get("code").and_then(Value::as_i64).or(raw.code),
                message: text("info")
                    .or_else(|| text("type"))
                    .unwrap_or_else(|| "unspecified provider error".to_string()),
            })
        }
        other => Err(ParseError::ErrorPayload(format!(
            "expected a string or an object in `error`, found {other}"
        ))),
    }
}

// Rates are decoded with arbitrary precision, which rules out untagged enums
// for numeric fields; the nested error form is read from a `Value` instead.
#[derive(Deserialize)]
struct ErrorBody {
    error: Value,
    #[serde(default, alias = "status")]
    code: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CurrencyField;
    use rust_decimal_macros::dec;

    fn request() -> ComposedRequest {
        ComposedRequest {
            echo_url: "http://localhost:8080/api/rates?base=USD&target=EUR".to_string(),
            upstream_url: "http://data.fixer.io/api/latest?base=USD&symbols=EUR".to_string(),
        }
    }

    fn fetched(outcome: Result<String, TransportError>) -> RateResult {
        normalize(Observation::Fetched {
            request: request(),
            outcome,
        })
    }

    #[test]
    fn rejected_query_becomes_client_error() {
        let result = normalize(Observation::Rejected {
            echo_url: "http://localhost:8080/api/rates?base=&target=EUR".to_string(),
            error: ValidationError::MissingCurrency {
                field: CurrencyField::Base,
            },
        });
        assert_eq!(
            result,
            RateResult::ClientError {
                echo_url: "http://localhost:8080/api/rates?base=&target=EUR".to_string(),
                error_message: "base currency is required".to_string(),
            }
        );
    }

    #[test]
    fn rate_body_becomes_success() {
        let result = fetched(Ok(r#"{"base":"USD","date":"2024-01-01","rates":{"EUR":0.92}}"#.to_string()));
        let RateResult::Success {
            echo_url,
            upstream_url,
            status_message,
            rate,
        } = result
        else {
            panic!("expected success");
        };
        assert_eq!(echo_url, request().echo_url);
        assert_eq!(upstream_url, request().upstream_url);
        assert_eq!(status_message, OK_MESSAGE);
        assert_eq!(rate.base, "USD");
        assert_eq!(rate.date, "2024-01-01");
        assert_eq!(rate.rates["EUR"], dec!(0.92));
    }

    #[test]
    fn extra_provider_fields_are_ignored() {
        let body = r#"{"success":true,"timestamp":1704067199,"historical":true,"base":"USD","date":"2024-01-01","rates":{"EUR":0.92}}"#;
        assert!(fetched(Ok(body.to_string())).is_success());
    }

    #[test]
    fn malformed_success_body_is_upstream_error() {
        let result = fetched(Ok(r#"{"base":"USD","rates":{"EUR":0.92}}"#.to_string()));
        let message = result.error_message().unwrap();
        assert!(matches!(result, RateResult::UpstreamError { .. }));
        assert!(message.starts_with("malformed rate payload"), "{message}");
        assert!(message.contains("date"), "{message}");
    }

    #[test]
    fn non_json_success_body_is_upstream_error() {
        let result = fetched(Ok("<html>maintenance</html>".to_string()));
        assert!(matches!(result, RateResult::UpstreamError { .. }));
        assert_eq!(result.upstream_url(), Some(request().upstream_url.as_str()));
    }

    #[test]
    fn provider_error_message_wins_over_status() {
        let result = fetched(Err(TransportError::Status {
            status: 422,
            body: r#"{"error":"Invalid base"}"#.to_string(),
        }));
        assert_eq!(
            result,
            RateResult::UpstreamError {
                echo_url: request().echo_url,
                upstream_url: request().upstream_url,
                error_message: "Invalid base".to_string(),
            }
        );
    }

    #[test]
    fn unparseable_error_body_falls_back_to_transport_message() {
        let result = fetched(Err(TransportError::Status {
            status: 503,
            body: "Service Unavailable".to_string(),
        }));
        assert_eq!(result.error_message(), Some("upstream returned HTTP 503"));
    }

    #[test]
    fn missing_body_surfaces_transport_message() {
        let result = fetched(Err(TransportError::Io {
            message: "connection refused".to_string(),
        }));
        assert_eq!(result.error_message(), Some("upstream request failed: connection refused"));
    }

    #[test]
    fn parse_error_body_reads_flat_form() {
        let err = parse_error_body(r#"{"error":"Invalid base","code":201}"#).unwrap();
        assert_eq!(
            err,
            ProviderError {
                code: Some(201),
                message: "Invalid base".to_string()
            }
        );

        let err = parse_error_body(r#"{"status":404,"error":"Not found"}"#).unwrap();
        assert_eq!(err.code, Some(404));
    }

    #[test]
    fn parse_error_body_reads_nested_form() {
        let body = r#"{"success":false,"error":{"code":202,"type":"invalid_currency_codes","info":"You have provided one or more invalid Currency Codes."}}"#;
        let err = parse_error_body(body).unwrap();
        assert_eq!(err.code, Some(202));
        assert_eq!(err.message, "You have provided one or more invalid Currency Codes.");

        let err = parse_error_body(r#"{"error":{"code":101,"type":"missing_access_key"}}"#).unwrap();
        assert_eq!(err.message, "missing_access_key");
    }

    #[test]
    fn parse_error_body_rejects_numeric_error_field() {
        let err = parse_error_body(r#"{"error":42}"#).unwrap_err();
        assert!(matches!(err, ParseError::ErrorPayload(_)));
    }

    #[test]
    fn parse_error_body_requires_error_field() {
        let err = parse_error_body(r#"{"message":"nope"}"#).unwrap_err();
        assert!(matches!(err, ParseError::ErrorPayload(_)));
    }
}
