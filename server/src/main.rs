use rates_server::app::{build_router, build_service};
use rates_server::config::{AppConfig, LogFormat};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();
    init_logging(config.as_ref().map(|c| c.log_format).unwrap_or_default());

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "config error");
            std::process::exit(1);
        }
    };

    let service = match build_service(&config) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "invalid service configuration");
            std::process::exit(1);
        }
    };

    let bind_addr = config.bind_addr();
    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(error = %e, bind_addr = %bind_addr, "server bind error");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        public_url = %config.public_url,
        provider_url = %config.provider_url,
        access_key = config.provider_access_key.is_some(),
        upstream_timeout_seconds = config.upstream_timeout.as_secs(),
        "rates-server started"
    );

    if let Err(e) = axum::serve(listener, build_router(service)).await {
        error!(error = %e, "server runtime error");
        std::process::exit(1);
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json().with_current_span(false)).init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}
