// Connection handling module
// Accepts a single TCP connection, enforces the connection limit and serves it over HTTP/1.1

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use super::signal::ShutdownSignal;
use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Active connection count, with a wakeup when it drops to zero
#[derive(Default)]
pub struct ConnectionCounter {
    active: AtomicUsize,
    idle: Notify,
}

impl ConnectionCounter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Reserve a connection slot, or return `false` when `max_connections` is reached.
    ///
    /// The counter is incremented before the check so concurrent accepts cannot both
    /// slip under the limit.
    pub fn try_reserve(&self, max_connections: Option<u64>) -> bool {
        let prev_count = self.active.fetch_add(1, Ordering::SeqCst);
        if let Some(max_conn) = max_connections {
            if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
                self.release();
                logger::log_warning(&format!(
                    "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
                ));
                return false;
            }
        }
        true
    }

    pub fn release(&self) {
        if self.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    /// Resolve once no connection holds a slot
    pub async fn wait_idle(&self) {
        loop {
            let idle = self.idle.notified();
            if self.active() == 0 {
                return;
            }
            idle.await;
        }
    }
}

/// Accept and process a connection, checking limits and logging.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<ConnectionCounter>,
    shutdown: &Arc<ShutdownSignal>,
) {
    if !conn_counter.try_reserve(state.config.performance.max_connections) {
        drop(stream);
        return;
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        Arc::clone(shutdown),
    );
}

/// Serve one connection on the local task set, releasing its slot when done.
///
/// On shutdown the connection finishes its in-flight request and then closes.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<ConnectionCounter>,
    shutdown: Arc<ShutdownSignal>,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let timeout_duration = Duration::from_secs(std::cmp::max(
            performance.read_timeout,
            performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let mut conn = std::pin::pin!(builder.serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, Arc::clone(&service_state), peer_addr)
            }),
        ));

        let served = async {
            tokio::select! {
                result = conn.as_mut() => result,
                () = shutdown.wait() => {
                    conn.as_mut().graceful_shutdown();
                    conn.as_mut().await
                }
            }
        };

        match tokio::time::timeout(timeout_duration, served).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        conn_counter.release();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_slot_without_limit() {
        let counter = ConnectionCounter::default();
        for _ in 0..10 {
            assert!(counter.try_reserve(None));
        }
        assert_eq!(counter.active(), 10);
    }

    #[test]
    fn test_reserve_slot_respects_limit() {
        let counter = ConnectionCounter::default();
        assert!(counter.try_reserve(Some(2)));
        assert!(counter.try_reserve(Some(2)));
        assert!(!counter.try_reserve(Some(2)));
        // rejected attempts roll the counter back
        assert_eq!(counter.active(), 2);

        counter.release();
        assert!(counter.try_reserve(Some(2)));
    }

    #[tokio::test]
    async fn test_wait_idle_resolves_after_last_release() {
        let counter = ConnectionCounter::new();
        assert!(counter.try_reserve(None));
        assert!(counter.try_reserve(None));

        let waiter = {
            let counter = Arc::clone(&counter);
            tokio::spawn(async move { counter.wait_idle().await })
        };
        tokio::task::yield_now().await;
        counter.release();
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        counter.release();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_idle_without_connections_is_immediate() {
        let counter = ConnectionCounter::default();
        tokio::time::timeout(Duration::from_millis(100), counter.wait_idle())
            .await
            .unwrap();
    }
}
