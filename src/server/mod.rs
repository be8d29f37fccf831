// Server module entry point
// Listener construction, per-connection serving, accept loops, signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mapped to `accept_loop`
#[path = "loop.rs"]
pub mod accept_loop;

// Re-export commonly used items
pub use accept_loop::run_accept_loop;
pub use connection::wait_for_connections_to_finish;
pub use listener::create_reusable_listener;
