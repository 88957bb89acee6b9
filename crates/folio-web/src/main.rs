mod api;
mod config;
mod dto;
mod error;
mod mailer;
mod middleware;
mod notify;
mod state;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderValue, Method};
use axum::middleware::from_fn;
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

const MAX_BODY_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_web=debug,folio_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;
    let bind_addr = config.bind_addr;
    let tls_config = config.tls.clone();
    let tls_enabled = config.tls_enabled();
    let rate_limit_rpm = config.rate_limit.requests_per_minute;
    let cors = cors_layer(&config.cors.allowed_origins)?;

    let mailer = mailer::build_mailer(&config)?;
    let state = AppState::new(&config, mailer);
    if state.notifier.is_some() {
        tracing::info!("Discord contact notices enabled");
    }

    // Expired code / grant / attempt cleanup
    let sweeper = state.contact.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            sweeper.sweep(Instant::now());
        }
    });

    // Rate limit config (per-IP)
    let period_per_request = 60 / rate_limit_rpm.max(1);
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(period_per_request.max(1).into())
            .burst_size(rate_limit_rpm.max(1))
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Failed to build rate limit config"))?,
    );

    // Per-IP limit only on the form endpoints, not on health checks
    let contact_routes = api::contact_router()
        .layer(GovernorLayer::<_, _, axum::body::Body>::new(governor_config));

    let base_router =
        axum::Router::new().nest("/api", contact_routes.merge(api::public_router()));

    let app = if tls_enabled {
        base_router
            .layer(from_fn(middleware::security_headers::security_headers_with_hsts))
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    } else {
        base_router
            .layer(from_fn(middleware::security_headers::security_headers))
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    };

    if let (Some(cert), Some(key)) = (&tls_config.cert_path, &tls_config.key_path) {
        use axum_server::tls_rustls::RustlsConfig;
        let rustls_config = RustlsConfig::from_pem_file(cert, key).await?;
        tracing::info!("folio-web listening on https://{}", bind_addr);
        axum_server::bind_rustls(bind_addr, rustls_config)
            .serve(app.into_make_service_with_connect_info::<std::net::SocketAddr>())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(bind_addr).await?;
        tracing::info!("folio-web listening on http://{}", bind_addr);
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .await?;
    }

    Ok(())
}

/// Same-origin only when no origins are configured.
fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return Ok(layer);
    }

    let origins = allowed_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|e| anyhow::anyhow!("Invalid CORS origin {o:?}: {e}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    tracing::info!("CORS enabled for {} origin(s)", origins.len());

    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_accepts_valid_origins() {
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["https://sam.dev".to_string()]).is_ok());
    }

    #[test]
    fn cors_rejects_invalid_origin() {
        assert!(cors_layer(&["https://bad\norigin".to_string()]).is_err());
    }
}
