//! The rate lookup pipeline.
//!
//! # Design
//! `CurrencyRateService` owns its validator, composer and upstream client,
//! all passed in at construction. It holds no mutable state, so a single
//! instance can serve concurrent requests from any thread.

use tracing::{info, warn};

use crate::client::UpstreamClient;
use crate::composer::UrlComposer;
use crate::error::ValidationError;
use crate::http::HttpTransport;
use crate::normalizer::{normalize, Observation};
use crate::types::{ComposedRequest, RateQuery, RateResult};
use crate::validator::ParamValidator;

pub struct CurrencyRateService<T> {
    validator: ParamValidator,
    composer: UrlComposer,
    client: UpstreamClient<T>,
}

impl<T: HttpTransport> CurrencyRateService<T> {
    pub fn new(validator: ParamValidator, composer: UrlComposer, client: UpstreamClient<T>) -> Self {
        Self {
            validator,
            composer,
            client,
        }
    }

    /// Look up rates for `query`. Makes at most one upstream call and always
    /// returns a result.
    pub fn get_rates(&self, query: &RateQuery) -> RateResult {
        let echo_url = self.composer.echo_url(query);
        info!(%echo_url, "rate lookup");

        if let Err(error) = self.validator.validate(query) {
            info!(%echo_url, %error, "rejected rate query");
            return normalize(Observation::Rejected { echo_url, error });
        }

        let upstream_url = match self.composer.upstream_url(query) {
            Ok(url) => url,
            Err(e) => {
                warn!(%echo_url, error = %e, "timestamp passed validation but not composition");
                return normalize(Observation::Rejected {
                    echo_url,
                    error: e.into(),
                });
            }
        };
        info!(%upstream_url, "calling rate provider");

        let outcome = self.client.fetch(&upstream_url);
        normalize(Observation::Fetched {
            request: ComposedRequest { echo_url, upstream_url },
            outcome,
        })
    }

    /// Reject `query` with an error found before it reached the pipeline,
    /// such as a malformed request line.
    pub fn reject(&self, query: &RateQuery, error: ValidationError) -> RateResult {
        let echo_url = self.composer.echo_url(query);
        info!(%echo_url, %error, "rejected rate query");
        normalize(Observation::Rejected { echo_url, error })
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &UpstreamClient<T> {
        &self.client
    }
}
