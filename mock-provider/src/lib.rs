use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Date reported by `/latest`.
pub const LATEST_DATE: &str = "2024-01-02";

/// First day with published reference rates.
pub const FIRST_DATE: &str = "1999-01-04";

/// Units of each currency per euro, as (code, mantissa, scale).
const EURO_RATES: &[(&str, i64, u32)] = &[
    ("AUD", 16400, 4),
    ("CAD", 14700, 4),
    ("CHF", 9650, 4),
    ("EUR", 1, 0),
    ("GBP", 8550, 4),
    ("JPY", 16150, 2),
    ("USD", 10870, 4),
];

#[derive(Debug, Deserialize)]
pub struct RatesParams {
    pub base: Option<String>,
    pub symbols: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatesBody {
    pub base: String,
    pub date: String,
    pub rates: BTreeMap<String, Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub error: String,
}

type Reply = Result<Json<RatesBody>, (StatusCode, Json<ErrorBody>)>;

pub fn app() -> Router {
    Router::new()
        .route("/latest", get(latest))
        .route("/{date}", get(historical))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn latest(Query(params): Query<RatesParams>) -> Reply {
    quote(LATEST_DATE.to_string(), &params)
}

async fn historical(Path(date): Path<String>, Query(params): Query<RatesParams>) -> Reply {
    let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| reject(StatusCode::BAD_REQUEST, 302, format!("Invalid date '{date}'")))?;
    let day = day.format("%Y-%m-%d").to_string();
    // Zero-padded ISO dates order the same as strings.
    if day.as_str() < FIRST_DATE {
        return Err(reject(
            StatusCode::NOT_FOUND,
            106,
            format!("No rates available before {FIRST_DATE}"),
        ));
    }
    quote(day, &params)
}

fn quote(date: String, params: &RatesParams) -> Reply {
    let base = non_empty(params.base.as_deref()).unwrap_or("EUR");
    let base_rate =
        euro_rate(base).ok_or_else(|| reject(StatusCode::BAD_REQUEST, 201, format!("Invalid base '{base}'")))?;

    let symbols: Vec<&str> = match non_empty(params.symbols.as_deref()) {
        Some(list) => list.split(',').map(str::trim).collect(),
        None => EURO_RATES
            .iter()
            .map(|(code, _, _)| *code)
            .filter(|code| *code != base)
            .collect(),
    };

    let mut rates = BTreeMap::new();
    for code in symbols {
        let rate = euro_rate(code)
            .ok_or_else(|| reject(StatusCode::BAD_REQUEST, 202, format!("Invalid symbol '{code}'")))?;
        rates.insert(code.to_string(), (rate / base_rate).round_dp(4));
    }

    Ok(Json(RatesBody {
        base: base.to_string(),
        date,
        rates,
    }))
}

fn euro_rate(code: &str) -> Option<Decimal> {
    EURO_RATES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, mantissa, scale)| Decimal::new(*mantissa, *scale))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn reject(status: StatusCode, code: u16, error: String) -> (StatusCode, Json<ErrorBody>) {
    (status, Json(ErrorBody { code, error }))
}
