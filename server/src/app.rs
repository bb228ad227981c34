use std::sync::Arc;

use axum::{routing::get, Router};
use rates_core::{
    ConfigError, CurrencyRateService, HttpTransport, ParamValidator, UpstreamClient, UreqTransport, UrlComposer,
};

use crate::config::AppConfig;
use crate::controller;

pub struct AppState<T> {
    pub service: Arc<CurrencyRateService<T>>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Wire the production service from configuration.
pub fn build_service(config: &AppConfig) -> Result<CurrencyRateService<UreqTransport>, ConfigError> {
    let mut composer = UrlComposer::new(&config.public_url, &config.provider_url)?;
    if let Some(key) = &config.provider_access_key {
        composer = composer.with_access_key(key.clone());
    }
    Ok(CurrencyRateService::new(
        ParamValidator::new(),
        composer,
        UpstreamClient::new(UreqTransport::new(config.upstream_timeout)),
    ))
}

pub fn build_router<T: HttpTransport + 'static>(service: CurrencyRateService<T>) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };
    Router::new()
        .route("/health", get(controller::health))
        .route("/api/rates", get(controller::get_rates::<T>))
        .with_state(state)
}
