//! Nexus billing service entry point.
//!
//! Loads configuration, wires adapters into the billing handlers and serves
//! the HTTP API until ctrl-c.

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use nexus_billing::adapters::auth::{JwtConfig, JwtSessionValidator};
use nexus_billing::adapters::email::{ResendConfig, ResendEmailSender};
use nexus_billing::adapters::http::{app_router, BillingAppState, BillingSettings, HttpSettings};
use nexus_billing::adapters::invoice::{GotenbergConfig, GotenbergPdfRenderer, HtmlInvoiceTemplates};
use nexus_billing::adapters::postgres::{
    PostgresPlanCatalog, PostgresPlanPaymentRepository, PostgresTenantDirectory,
};
use nexus_billing::adapters::razorpay::{RazorpayConfig, RazorpayGateway};
use nexus_billing::config::{AppConfig, ConfigError, ServerConfig, ValidationError};
use nexus_billing::domain::billing::{GatewaySignatureVerifier, PaymentTokenCodec, TokenError};
use nexus_billing::ports::{EmailError, GatewayError, RenderError};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidConfig(#[from] ValidationError),

    #[error("payment token key: {0}")]
    TokenKey(#[from] TokenError),

    #[error("payment gateway client: {0}")]
    Gateway(#[from] GatewayError),

    #[error("email client: {0}")]
    Email(#[from] EmailError),

    #[error("document renderer client: {0}")]
    Renderer(#[from] RenderError),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!(error = %err, "Startup failed");
        eprintln!("nexus-billing: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        entitlement_policy = ?config.billing.entitlement_policy,
        admin_routes = config.admin.is_enabled(),
        "Configuration loaded"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let gateway = RazorpayGateway::new(
        RazorpayConfig::new(
            config.payment.razorpay_key_id.clone(),
            config.payment.razorpay_key_secret.clone(),
        )
        .with_base_url(config.payment.api_base_url.clone())
        .with_timeout(config.payment.timeout()),
    )?;

    let email = ResendEmailSender::new(
        ResendConfig::new(
            config.email.resend_api_key.clone(),
            config.email.from_email.clone(),
        )
        .with_from_name(config.email.from_name.clone())
        .with_base_url(config.email.api_base_url.clone())
        .with_timeout(config.email.timeout()),
    )?;

    let renderer = GotenbergPdfRenderer::new(
        GotenbergConfig::new(config.renderer.url.clone()).with_timeout(config.renderer.timeout()),
    )?;

    let codec = PaymentTokenCodec::from_hex(config.payment.token_encryption_key.expose_secret())?;
    let verifier = GatewaySignatureVerifier::new(config.payment.razorpay_key_secret.clone());

    let sessions = JwtSessionValidator::new(
        JwtConfig::new(config.auth.jwt_secret.clone()).with_leeway(config.auth.leeway_secs),
    );

    let state = BillingAppState {
        payments: Arc::new(PostgresPlanPaymentRepository::new(pool.clone())),
        tenants: Arc::new(PostgresTenantDirectory::new(pool.clone())),
        plans: Arc::new(PostgresPlanCatalog::new(pool)),
        gateway: Arc::new(gateway),
        email: Arc::new(email),
        renderer: Arc::new(renderer),
        templates: Arc::new(HtmlInvoiceTemplates::new(
            config.billing.company_name.clone(),
            config.server.public_base_url.clone(),
        )),
        sessions: Arc::new(sessions),
        codec: Arc::new(codec),
        verifier: Arc::new(verifier),
        settings: BillingSettings {
            currency: config.payment.currency.clone(),
            entitlement_policy: config.billing.entitlement_policy,
            stale_pending_after_mins: config.billing.stale_pending_after_mins,
            admin_api_key: config.admin.api_key.clone(),
        },
    };

    let http = HttpSettings {
        request_timeout: config.server.request_timeout(),
        cors_origins: config.server.cors_origins_list(),
    };
    let app = app_router(state, &http);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
