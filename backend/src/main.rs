//! Complaint desk entry point: settings, stores, and the HTTP server.

mod server;

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use mockable::{Clock, DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use complaints::inbound::http::health::HealthState;
use complaints::inbound::http::session_config::session_settings_from_env;
use complaints::middleware::RateLimit;
use complaints::outbound::persistence::{
    PoolConfig, RetryPolicy, connect_with_retry, run_pending_migrations,
};
use complaints::outbound::security::Argon2SecretHasher;
use complaints::settings::AppSettings;
use server::{ServerConfig, build_http_state, create_server};

const RATE_LIMIT_SWEEP: Duration = Duration::from_secs(60);

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("loading settings")?;
    let profile = settings.profile();
    let session = session_settings_from_env(&DefaultEnv::new(), profile)
        .wrap_err("loading session settings")?;
    let bind_addr = settings
        .bind_addr()
        .ok_or_else(|| eyre!("invalid bind address {}:{}", settings.host(), settings.port))?;

    let pool = match settings.database_url() {
        Some(url) => {
            let pool = connect_with_retry(PoolConfig::new(url), RetryPolicy::default())
                .await
                .wrap_err("connecting to the database")?;
            let applied = run_pending_migrations(url)
                .await
                .wrap_err("running migrations")?;
            info!(applied, "database migrations applied");
            Some(pool)
        }
        None => {
            warn!("no database configured; records live in memory and vanish on restart");
            None
        }
    };

    let hasher = Arc::new(Argon2SecretHasher::production().wrap_err("configuring argon2")?);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let http_state = build_http_state(pool.as_ref(), hasher, clock);

    let rate_limit = RateLimit::default();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        http_state,
        rate_limit.clone(),
        ServerConfig::new(session, bind_addr),
    )?;
    info!(%bind_addr, ?profile, "listening");

    tokio::spawn(sweep_rate_limits(rate_limit));
    tokio::spawn(shutdown_on_signal(health_state, server.handle()));
    server.await?;
    info!("server stopped");
    Ok(())
}

async fn sweep_rate_limits(rate_limit: RateLimit) {
    let mut interval = tokio::time::interval(RATE_LIMIT_SWEEP);
    loop {
        interval.tick().await;
        rate_limit.retain_recent();
    }
}

/// Fail liveness first so the orchestrator stops routing, then drain.
async fn shutdown_on_signal(health_state: web::Data<HealthState>, handle: ServerHandle) {
    let signal = wait_for_signal().await;
    info!(signal, "shutdown requested");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(error) => {
            warn!(%error, "cannot listen for SIGTERM; only SIGINT will stop the server");
            return match tokio::signal::ctrl_c().await {
                Ok(()) => "SIGINT",
                Err(_) => "signal listener failed",
            };
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "ctrl-c",
        Err(_) => "signal listener failed",
    }
}
