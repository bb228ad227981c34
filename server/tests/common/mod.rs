use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::Router;
use rates_core::{
    CurrencyRateService, HttpResponse, HttpTransport, ParamValidator, TransportError, UpstreamClient, UrlComposer,
};
use rates_server::app::build_router;

/// Canned provider answer shared with the test through an `Arc` counter.
pub struct StubTransport {
    pub outcome: Result<HttpResponse, TransportError>,
    pub calls: Arc<AtomicUsize>,
}

impl HttpTransport for StubTransport {
    fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Router backed by a stub provider, plus the stub's call counter.
pub fn router(outcome: Result<HttpResponse, TransportError>) -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let transport = StubTransport {
        outcome,
        calls: Arc::clone(&calls),
    };
    let service = CurrencyRateService::new(
        ParamValidator::new(),
        UrlComposer::new("http://localhost:8080/api", "http://provider.test/api").unwrap(),
        UpstreamClient::new(transport),
    );
    (build_router(service), calls)
}
