use std::sync::Arc;
use tokio::sync::Notify;

mod api;
mod config;
mod http;
mod logger;
mod server;
mod store;

/// Config file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let store = store::connect(&cfg.store).await.map_err(|e| {
        logger::log_error(&format!("Failed to connect to document store: {e}"));
        e
    })?;

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&listener.local_addr()?, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    let state = Arc::new(config::AppState::new(cfg, store));
    server::start_server_loop(listener, state, shutdown).await;

    logger::log_info("Server stopped");
    Ok(())
}
