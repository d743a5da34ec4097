// ============================================================================
// THRESHOLD BET — SERVER
// ============================================================================
//
// Engine:  linear payout curve, 2x at the midpoint → 10x at the edges
// Storage: ReDB (ACID, single writer) + DashMap balance cache
// Auth:    HS256 bearer tokens
//
// Run:  BET_JWT_SECRET=... cargo run
// Test: curl http://localhost:8080/health
//
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use threshold_bet::{build_router, AppState, BetEngine, Config, GameStore, ThreadRngSource};

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// GRACEFUL SHUTDOWN
// ============================================================================

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    warn!("🛑 Shutdown signal received");
}

// ============================================================================
// MAIN
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // 1. Logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,threshold_bet=debug")))
        .with(tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true))
        .init();

    info!("🎲 Threshold Bet v{}", VERSION);

    // 2. Config
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("❌ FATAL: {}", e);
            return Err(e.into());
        }
    };

    // 3. Storage
    info!("🗄️  Initializing ReDB at {}", config.data_path);
    let store = match GameStore::new(&config.data_path) {
        Ok(s) => s,
        Err(e) => {
            error!("❌ FATAL: {}", e);
            return Err(e.into());
        }
    };

    // 4. Engine + state
    let engine = BetEngine::new(store, Arc::new(ThreadRngSource), config.starting_balance)
        .with_history_limit(config.history_limit);
    let state = AppState::new(engine, &config.jwt_secret);

    // 5. HTTP server
    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr;

    info!("🚀 Listening on http://{}", addr);
    info!("📡 ENDPOINTS:");
    info!("   GET  /health                    Health check");
    info!("   GET  /game/quote                Multiplier / odds preview");
    info!("   POST /game/account              Open account (bearer)");
    info!("   POST /game/bet                  Place bet (bearer)");
    info!("   GET  /game/history              Last bets (bearer)");
    info!("   GET  /game/balance              Balance (bearer)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("✅ Server shutdown complete");
    Ok(())
}
