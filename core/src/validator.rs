//! Parameter validation for rate queries.
//!
//! Pure checks only: no network, no logging. The first failing rule wins.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};

use crate::composer::parse_timestamp;
use crate::error::{CurrencyField, ValidationError};
use crate::types::RateQuery;

/// Reference currencies published by the provider.
pub const SUPPORTED_CURRENCIES: &[&str] = &[
    "AUD", "BGN", "BRL", "CAD", "CHF", "CNY", "CZK", "DKK", "EUR", "GBP", "HKD", "HRK", "HUF", "IDR", "ILS", "INR",
    "ISK", "JPY", "KRW", "MXN", "MYR", "NOK", "NZD", "PHP", "PLN", "RON", "RUB", "SEK", "SGD", "THB", "TRY", "USD",
    "ZAR",
];

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Clone)]
pub struct ParamValidator {
    currencies: BTreeSet<String>,
    today: fn() -> NaiveDate,
}

impl Default for ParamValidator {
    fn default() -> Self {
        Self::with_currencies(SUPPORTED_CURRENCIES.iter().copied())
    }
}

impl ParamValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept only `codes` as base or target currencies.
    pub fn with_currencies<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            currencies: codes.into_iter().map(Into::into).collect(),
            today: utc_today,
        }
    }

    /// Replace the clock used to reject future dates.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn validate(&self, query: &RateQuery) -> Result<(), ValidationError> {
        self.check_currency(CurrencyField::Base, &query.base)?;
        self.check_currency(CurrencyField::Target, &query.target)?;
        if query.base == query.target {
            return Err(ValidationError::SameCurrency {
                code: query.base.clone(),
            });
        }

        if let Some(raw) = query.timestamp() {
            let date = parse_timestamp(raw)?;
            if date > (self.today)() {
                return Err(ValidationError::FutureDate { value: raw.to_string() });
            }
        }
        Ok(())
    }

    fn check_currency(&self, field: CurrencyField, code: &str) -> Result<(), ValidationError> {
        if code.trim().is_empty() {
            return Err(ValidationError::MissingCurrency { field });
        }
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ValidationError::MalformedCurrency {
                field,
                code: code.to_string(),
            });
        }
        if !self.currencies.contains(code) {
            return Err(ValidationError::UnsupportedCurrency {
                field,
                code: code.to_string(),
            });
        }
        Ok(())
    }
}
