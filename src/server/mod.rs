// Server module entry point
// Binds the listener and runs the accept loop until shutdown is requested

pub mod connection;
pub mod listener;
pub mod signal;

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

pub use connection::ConnectionCounter;
pub use listener::create_reusable_listener;
pub use signal::{start_signal_handler, ShutdownSignal};

/// Accept connections on `listener` until `shutdown` fires, then wait for open
/// connections to finish their in-flight requests.
///
/// Must run inside a `LocalSet`: connections are served with `spawn_local`. The drain is
/// bounded by the per-connection timeout.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<ShutdownSignal>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = ConnectionCounter::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &shutdown,
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.wait() => break,
        }
    }

    drop(listener);
    logger::log_shutdown(active_connections.active());

    let performance = &state.config.performance;
    let drain_timeout = Duration::from_secs(std::cmp::max(
        performance.read_timeout,
        performance.write_timeout,
    ));
    if tokio::time::timeout(drain_timeout, active_connections.wait_idle())
        .await
        .is_err()
    {
        logger::log_warning(&format!(
            "{} connection(s) still open after {}s drain, closing",
            active_connections.active(),
            drain_timeout.as_secs()
        ));
    }
    Ok(())
}
