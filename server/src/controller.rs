use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rates_core::{HttpTransport, RateQuery, RateResult, ValidationError};
use serde_json::json;
use tracing::{error, info_span};
use url::form_urlencoded;

use crate::app::AppState;

/// Inbound query parameters. The first value of each parameter wins; unknown
/// parameters are ignored.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RateParams {
    pub base: Option<String>,
    pub target: Option<String>,
    pub timestamp: Option<String>,
    /// First known parameter that appeared more than once.
    pub repeated: Option<&'static str>,
}

impl RateParams {
    pub fn parse(raw: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let (name, slot) = match key.as_ref() {
                "base" => ("base", &mut params.base),
                "target" => ("target", &mut params.target),
                "timestamp" => ("timestamp", &mut params.timestamp),
                _ => continue,
            };
            if slot.is_some() {
                params.repeated.get_or_insert(name);
            } else {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// Missing currencies become empty strings so the validator reports them.
    pub fn into_query(self) -> RateQuery {
        RateQuery::new(self.base.unwrap_or_default(), self.target.unwrap_or_default(), self.timestamp)
    }
}

pub async fn get_rates<T: HttpTransport + 'static>(
    State(state): State<AppState<T>>,
    RawQuery(raw): RawQuery,
) -> Response {
    let params = RateParams::parse(raw.as_deref().unwrap_or_default());
    let repeated = params.repeated;
    let query = params.into_query();
    let span = info_span!("get_rates", base = %query.base, target = %query.target);
    let service = Arc::clone(&state.service);

    let lookup = move || {
        span.in_scope(|| match repeated {
            Some(name) => service.reject(&query, ValidationError::RepeatedParameter { name }),
            None => service.get_rates(&query),
        })
    };
    match tokio::task::spawn_blocking(lookup).await {
        Ok(result) => (status_for(&result), Json(result)).into_response(),
        Err(e) => {
            error!(error = %e, "rate lookup task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "internal_error", "errorMessage": "rate lookup failed" })),
            )
                .into_response()
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub fn status_for(result: &RateResult) -> StatusCode {
    match result {
        RateResult::Success { .. } => StatusCode::OK,
        RateResult::ClientError { .. } => StatusCode::BAD_REQUEST,
        RateResult::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
    }
}
