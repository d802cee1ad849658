//! Backend entry-point: loads configuration, wires adapters and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, create_server};
use ticketing::domain::PaymentProvider;
use ticketing::domain::ports::PaymentGateways;
use ticketing::inbound::http::health::HealthState;
use ticketing::inbound::http::session_config::{BuildMode, session_settings_from_env};
use ticketing::outbound::payments::{PaypalGateway, ZoopGateway};
use ticketing::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %session.key_fingerprint(), "session key loaded");

    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let gateways = build_gateways(&settings)?;
    let webhook_secrets = settings.webhook_secrets();
    for provider in [PaymentProvider::Zoop, PaymentProvider::Paypal] {
        if !webhook_secrets.is_configured(provider) {
            warn!(%provider, "no webhook secret configured; notifications will be rejected");
        }
    }
    let mut config =
        ServerConfig::new(session, bind_addr, gateways).with_webhook_secrets(webhook_secrets);

    match settings.database_url() {
        Some(url) => {
            if settings.run_migrations {
                run_pending_migrations(url)
                    .await
                    .map_err(std::io::Error::other)?;
            }
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            )
            .await
            .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
            info!(max_connections = settings.db_max_connections(), "using postgres persistence");
        }
        None => warn!("no database configured; using in-memory persistence"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await
}

fn build_gateways(settings: &AppSettings) -> std::io::Result<PaymentGateways> {
    let default_provider = settings
        .payments_provider()
        .map_err(std::io::Error::other)?;
    let zoop = settings
        .zoop_checkout_url
        .as_deref()
        .map_or_else(ZoopGateway::default, ZoopGateway::new);
    let paypal = settings
        .paypal_approval_url
        .as_deref()
        .map_or_else(PaypalGateway::default, PaypalGateway::new);
    Ok(PaymentGateways::new(default_provider)
        .with_gateway(Arc::new(zoop))
        .with_gateway(Arc::new(paypal)))
}
