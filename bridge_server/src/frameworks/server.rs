// Framework bootstrap for the bridge server runtime.

use crate::frameworks::config;
use crate::interface_adapters::net::ws_handler;
use crate::interface_adapters::state::{AppState, SessionSettings};
use crate::use_cases::{GameHandle, GameSettings};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state();
    let game = state.game.clone();

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    let served = axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    });
    game.shutdown();
    served
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::new(config::http_host(), config::http_port());

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Arc<AppState> {
    let settings = GameSettings {
        mailbox_capacity: config::INPUT_CHANNEL_CAPACITY,
        tick_interval: config::tick_interval(),
        scenario: config::scenario(),
    };
    tracing::debug!(
        tick_ms = settings.tick_interval.as_millis(),
        pirates = settings.scenario.pirates,
        traders = settings.scenario.traders,
        asteroids = settings.scenario.asteroids,
        "world configured"
    );

    // The world actor owns all simulation state; sessions only hold its mailbox.
    let game = GameHandle::spawn(&settings);

    Arc::new(AppState {
        game,
        session: SessionSettings {
            snapshot_interval: config::snapshot_interval(),
            max_in_flight: config::max_in_flight_snapshots(),
        },
    })
}
