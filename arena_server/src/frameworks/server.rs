// Framework bootstrap for the arena server runtime.

use crate::domain::World;
use crate::domain::ports::Broadcaster;
use crate::domain::tuning::Tuning;
use crate::frameworks::config;
use crate::interface_adapters::net::{SnapshotBroadcaster, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::world_task;

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, path::PathBuf, sync::Arc};
use tokio::sync::Notify;
use tower_http::services::ServeDir;

// Loads `.env` and installs the tracing subscriber and panic hook for the arena process.
fn init_tracing() -> config::LogFormat {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let format = config::log_format();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true);
    match format {
        config::LogFormat::Json => subscriber.json().with_current_span(true).init(),
        config::LogFormat::Compact => subscriber.compact().init(),
    }

    // A panic in a connection task only ends that connection; record where it happened.
    std::panic::set_hook(Box::new(|info| {
        let thread = std::thread::current();
        let location = info.location().map(|l| format!("{}:{}", l.file(), l.line()));
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(
            service = env!("CARGO_PKG_NAME"),
            thread = thread.name().unwrap_or("unnamed"),
            location = location.as_deref().unwrap_or("unknown"),
            %info,
            ?backtrace,
            "task panicked"
        );
    }));

    format
}

/// Serves the arena on an already-bound listener until the server fails.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    run_with_static_dir(listener, config::static_dir()).await
}

pub async fn run_with_static_dir(
    listener: tokio::net::TcpListener,
    static_dir: PathBuf,
) -> Result<()> {
    let address = listener.local_addr()?;
    // build state
    let state = build_state();
    let shutdown = Arc::new(Notify::new());

    // The simulation runs independently of client activity.
    tokio::spawn(world_task(
        state.world.clone(),
        state.broadcaster.clone(),
        config::tick_interval(),
        config::SIMULATION_STEP_SECONDS,
        state.tuning.projectile,
        shutdown.clone(),
    ));

    let app = app(state, static_dir.clone());

    tracing::info!(%address, static_dir = %static_dir.display(), "listening");

    // Serve app and report errors rather than panicking
    let result = axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    });
    shutdown.notify_one();
    result
}

pub async fn run_with_config() -> Result<()> {
    let log_format = init_tracing();

    let address = SocketAddr::new(config::bind_address(), config::http_port());
    tracing::info!(
        service = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        ?log_format,
        tick_interval_ms = config::tick_interval().as_millis() as u64,
        "starting arena server"
    );

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

pub fn app(state: Arc<AppState>, static_dir: PathBuf) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}

fn build_state() -> Arc<AppState> {
    let tuning = Tuning::default();
    let world = World::new(tuning.arena).into_shared();
    let broadcaster: Arc<dyn Broadcaster> = Arc::new(SnapshotBroadcaster::new(world.clone()));

    Arc::new(AppState {
        world,
        broadcaster,
        tuning,
        outbound_capacity: config::OUTBOUND_QUEUE_CAPACITY,
    })
}
