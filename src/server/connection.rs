// Connection handling module
// Accepts and serves a single TCP connection

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppState;
use crate::handler::{self, ListenerRole};
use crate::logger;

/// Accept and process a connection, checking limits and logging.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    role: &Arc<ListenerRole>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if role.check_connection_limits {
        if let Some(max_conn) = state.config.performance.max_connections {
            if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
                // Exceeded limit: rollback counter and reject
                conn_counter.fetch_sub(1, Ordering::SeqCst);
                logger::log_warning(&format!(
                    "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
                ));
                drop(stream);
                return;
            }
        }
    }

    if state.config.logging.access_log && state.config.logging.show_headers {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        Arc::clone(role),
    );
}

/// Serve a single connection in a spawned task.
///
/// Wraps the stream in `TokioIo`, configures HTTP/1.1 keep-alive, applies
/// the configured overall timeout, and decrements the connection counter
/// when done.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    role: Arc<ListenerRole>,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let keep_alive_timeout = state.config.performance.keep_alive_timeout;
        let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
            state.config.performance.read_timeout,
            state.config.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        if keep_alive_timeout > 0 {
            builder.keep_alive(true);
        }

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                let role = Arc::clone(&role);
                async move { handler::handle_request(req, state, role, peer_addr).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Wait until every tracked connection has finished, up to `timeout`.
///
/// Used after the accept loops stop so in-flight connections can complete
/// before the runtime is torn down. Returns false when connections are
/// still active at the deadline; the caller proceeds with teardown anyway.
pub async fn wait_for_connections_to_finish(
    counters: &[Arc<AtomicUsize>],
    timeout: Duration,
) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let active: usize = counters.iter().map(|c| c.load(Ordering::SeqCst)).sum();
        if active == 0 {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown drain timed out with {active} connection(s) still active"
            ));
            return false;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_waits_for_active_connections() {
        let counter = Arc::new(AtomicUsize::new(1));
        let worker = Arc::clone(&counter);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            worker.fetch_sub(1, Ordering::SeqCst);
        });

        let drained =
            wait_for_connections_to_finish(&[counter], Duration::from_secs(1)).await;
        assert!(drained);
    }

    #[tokio::test]
    async fn test_drain_gives_up_at_deadline() {
        let stuck = Arc::new(AtomicUsize::new(1));
        let drained =
            wait_for_connections_to_finish(&[stuck], Duration::from_millis(60)).await;
        assert!(!drained);
    }

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let counter = Arc::new(AtomicUsize::new(0));
        assert!(wait_for_connections_to_finish(&[counter], Duration::from_secs(1)).await);
    }
}
