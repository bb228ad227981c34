//! Synchronous currency rate lookup core.
//!
//! # Overview
//! Validates a `RateQuery`, composes the provider URL, performs a single GET
//! through an `HttpTransport` and normalizes whatever came back into exactly
//! one `RateResult`: `Success`, `ClientError` or `UpstreamError`.
//!
//! # Design
//! - `CurrencyRateService` is assembled from its parts by the caller
//!   (`ParamValidator`, `UrlComposer`, `UpstreamClient`); nothing is global.
//! - Socket I/O sits behind `HttpTransport`. `UreqTransport` is the blocking
//!   implementation; tests plug in canned responses.
//! - Internal failures (`FormatError`, `TransportError`, `ParseError`) are
//!   converted to result data inside the service and never reach the caller.

pub mod client;
pub mod composer;
pub mod error;
pub mod http;
pub mod normalizer;
pub mod service;
pub mod types;
pub mod validator;

pub use client::UpstreamClient;
pub use composer::UrlComposer;
pub use error::{ConfigError, CurrencyField, FormatError, ParseError, TransportError, ValidationError};
pub use http::{HttpResponse, HttpTransport, UreqTransport};
pub use normalizer::{normalize, Observation, OK_MESSAGE};
pub use service::CurrencyRateService;
pub use types::{ComposedRequest, CurrencyRate, ProviderError, RateQuery, RateResult};
pub use validator::ParamValidator;
