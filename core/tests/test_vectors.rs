//! Run the full pipeline against JSON test vectors stored in `test-vectors/`.
//!
//! Each case describes a query, the simulated provider response (or transport
//! failure), how many upstream calls are allowed, and the serialized result.
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rates_core::{
    CurrencyRateService, HttpResponse, HttpTransport, ParamValidator, RateQuery, TransportError, UpstreamClient,
    UrlComposer,
};

/// Transport that answers every request with the case's simulated outcome.
struct Simulated {
    outcome: Result<HttpResponse, TransportError>,
    calls: Arc<AtomicUsize>,
}

impl HttpTransport for Simulated {
    fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Build the simulated outcome from a test vector case.
fn simulated(case: &serde_json::Value, calls: Arc<AtomicUsize>) -> Simulated {
    let outcome = match case.get("transport_error") {
        Some(message) => Err(TransportError::Io {
            message: message.as_str().unwrap().to_string(),
        }),
        None => {
            let sim = &case["simulated_response"];
            Ok(HttpResponse::new(
                sim["status"].as_u64().unwrap() as u16,
                sim["body"].as_str().unwrap(),
            ))
        }
    };
    Simulated { outcome, calls }
}

#[test]
fn pipeline_test_vectors() {
    let raw = include_str!("../../test-vectors/pipeline.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    let echo_base = vectors["echo_base"].as_str().unwrap();
    let provider_base = vectors["provider_base"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let query: RateQuery = serde_json::from_value(case["query"].clone()).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let svc = CurrencyRateService::new(
            ParamValidator::new(),
            UrlComposer::new(echo_base, provider_base).unwrap(),
            UpstreamClient::new(simulated(case, Arc::clone(&calls))),
        );
        let result = svc.get_rates(&query);

        let calls = calls.load(Ordering::SeqCst);
        assert_eq!(calls as u64, case["expected_calls"].as_u64().unwrap(), "{name}: upstream calls");

        let actual = serde_json::to_value(&result).unwrap();
        assert_eq!(actual, case["expected_result"], "{name}: result");
    }
}
