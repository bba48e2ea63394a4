//! # workshiftd — workshift daemon
//!
//! Composition root that wires the schedules, observers and HTTP adapter
//! together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Install the `tracing` subscriber
//! - Load the localised default shift label
//! - Seed the workday signals and start one integration per schedule
//! - Build the axum router over the shared state registry
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT), tearing down every observer
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use workshift_adapter_http_axum::router;
use workshift_adapter_http_axum::state::AppState;
use workshift_app::event_bus::InProcessEventBus;
use workshift_app::integration::WorkshiftIntegration;
use workshift_app::label::load_shift_label;
use workshift_app::ports::SystemClock;
use workshift_app::registry::StateRegistry;
use workshift_domain::id::EntryId;
use workshift_domain::schedule::ScheduleConfig;
use workshift_domain::time::{local_date, now};

use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let host_zone = config.time_zone();
    let label = load_shift_label(&config.host.translations_dir, &config.host.language).await;

    // Event bus and shared state
    let event_bus = Arc::new(InProcessEventBus::default());
    let registry = Arc::new(StateRegistry::new(Arc::clone(&event_bus)));
    for (signal_id, raw) in &config.signals {
        registry.set_signal(signal_id.clone(), raw.clone()).await?;
    }

    // Integrations
    let today = local_date(now(), host_zone);
    let mut integrations = Vec::with_capacity(config.schedules.len());
    for settings in &config.schedules {
        let schedule = ScheduleConfig::builder_from_settings(settings, today, host_zone)
            .default_label(label.clone())
            .build();
        let mut integration = WorkshiftIntegration::new(
            EntryId::for_schedule(&settings.name),
            Arc::new(schedule),
            Arc::clone(&registry),
            SystemClock,
        );
        integration
            .start()
            .await
            .with_context(|| format!("starting schedule {:?}", settings.name))?;
        integrations.push(integration);
    }
    if integrations.is_empty() {
        tracing::warn!("no schedules configured, serving an empty registry");
    }

    // HTTP
    let app = router::build(AppState::from_arc(Arc::clone(&registry), SystemClock));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, schedules = integrations.len(), "workshiftd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for integration in &mut integrations {
        integration.teardown().await;
    }
    tracing::info!("workshiftd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown requested");
}
