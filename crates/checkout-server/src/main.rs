//! Checkout HTTP Server
//!
//! Axum server for the consulting site's checkout: server-side payment
//! verification plus the read-only catalog and client settings the browser
//! needs to open the hosted payment widget.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_payments::{
    PaystackClient, PaystackConfig, TransactionLookup, VerificationError, VerificationService,
};

use crate::handlers::{checkout_config, health_check, list_packages, verify_payment};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Gateway verification
    let config = PaystackConfig::from_env();
    let lookup: Option<Arc<dyn TransactionLookup>> = match PaystackClient::from_config(&config) {
        Ok(client) => {
            tracing::info!("✓ Payment gateway configured ({})", config.base_url);
            Some(Arc::new(client))
        }
        Err(VerificationError::NotConfigured) => {
            tracing::warn!("⚠ Payment gateway not configured - verification disabled");
            tracing::warn!("  Set PAYSTACK_SECRET_KEY in .env");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let public_key = std::env::var("PAYSTACK_PUBLIC_KEY").ok();
    if public_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
        tracing::warn!("⚠ PAYSTACK_PUBLIC_KEY not set - browser checkout cannot open");
    }

    let state = AppState::new(VerificationService::new(lookup), public_key);
    let app = build_router(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 checkout server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health              - Health check");
    tracing::info!("  GET  /api/packages        - Package catalog");
    tracing::info!("  GET  /api/checkout/config - Client checkout settings");
    tracing::info!("  POST /api/verify-payment  - Verify payment reference");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Assemble routes and middleware around the given state
pub fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/packages", get(list_packages))
        .route("/api/checkout/config", get(checkout_config))
        // Payments
        .route("/api/verify-payment", post(verify_payment))
        // Static site assets
        .fallback_service(ServeDir::new("static"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
