// Server loop module
// Accepts connections until shutdown, then drains in-flight connections

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` is notified.
///
/// After the listener is closed, waits up to `performance.shutdown_timeout`
/// seconds for active connections to finish.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    let drained = tokio::time::timeout(grace, async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    })
    .await;

    match drained {
        Ok(()) => logger::log_info("[SHUTDOWN] All connections closed"),
        Err(_) => logger::log_warning(&format!(
            "[SHUTDOWN] {} connection(s) still open after {}s, exiting anyway",
            active_connections.load(Ordering::SeqCst),
            grace.as_secs()
        )),
    }
}
