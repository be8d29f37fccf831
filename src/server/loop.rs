// Accept loop module
// One loop per listener; runs until the shutdown signal fires

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::handler::ListenerRole;
use crate::logger;

/// Accept connections until shutdown is signalled.
///
/// On shutdown the listener is dropped so no new connections are accepted;
/// connections already being served finish in their own tasks.
pub async fn run_accept_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    role: Arc<ListenerRole>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &role,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!(
                            "{}Failed to accept connection: {e}",
                            prefix(&role)
                        ));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_listener_stopped(role.log_prefix);
                break;
            }
        }
    }
}

fn prefix(role: &ListenerRole) -> String {
    if role.log_prefix.is_empty() {
        String::new()
    } else {
        format!("{} ", role.log_prefix)
    }
}
