//! Timer Board - A state-managed HTTP server for categorized countdown timers
//! 
//! This is the main entry point for the timer-board application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use timer_board::{
    config::Config,
    state::AppState,
    api::create_router,
    services::{FileStorage, MemoryStorage, Storage},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_board={},tower_http=info", config.log_level()))
        .init();

    info!("Starting timer-board server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_ms);

    let storage: Arc<dyn Storage> = if config.ephemeral {
        info!("Ephemeral mode, nothing will be written to disk");
        Arc::new(MemoryStorage::new())
    } else {
        let dir = config.data_dir.clone().unwrap_or_else(FileStorage::default_dir);
        info!("Storing timers in {}", dir.display());
        Arc::new(FileStorage::new(dir))
    };

    // Create application state and resume a ticker for every stored timer
    let state = Arc::new(AppState::new(storage, config.tick_interval(), config.prefer_dark));
    state.start_tickers();

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    
    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET/POST    /timers                      - List or create timers");
    info!("  GET/DELETE  /timers/:id[?confirm=true]   - Inspect or delete a timer");
    info!("  POST        /timers/:id/{{start,pause,toggle,reset}}");
    info!("  GET         /categories, /history, /categories/suggestions");
    info!("  POST        /categories/:category/{{start,pause,reset,expand,history}}");
    info!("  GET/POST    /theme, /theme/toggle");
    info!("  GET         /health");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);
    
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.stop_tickers();
    info!("Server shutdown complete");
    Ok(())
}
