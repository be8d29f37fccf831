use clap::Parser;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::Notify;

mod cli;
mod config;
mod cv;
mod error;
mod handler;
mod http;
mod logger;
mod redirect;
mod render;
mod server;

use error::StartupError;

fn main() -> Result<(), StartupError> {
    let args = cli::Cli::parse();

    let mut cfg = config::Config::load_from(&args.config)?;
    if let Some(cv_path) = args.cv {
        cfg.site.cv_path = cv_path;
    }

    logger::init(&cfg)?;

    // Build the Tokio runtime, sized by the workers setting when present
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), StartupError> {
    let app_addr = cfg.get_socket_addr()?;
    let app_listener = server::create_reusable_listener(app_addr)?;

    // Optional plain-HTTP listener whose only job is the HTTPS upgrade
    let upgrade_listener = if cfg.server.enable_redirect_server {
        let addr = cfg.get_redirect_socket_addr()?;
        Some((addr, server::create_reusable_listener(addr)?))
    } else {
        None
    };

    let app_role = Arc::new(handler::ListenerRole {
        secure: cfg.server.behind_tls,
        policy: cfg.app_policy(),
        check_connection_limits: true,
        log_prefix: "",
    });
    let upgrade_role = Arc::new(handler::ListenerRole {
        secure: false,
        policy: cfg.upgrade_policy(),
        check_connection_limits: false,
        log_prefix: "[UPGRADE]",
    });

    logger::log_server_start(&app_addr, upgrade_listener.as_ref().map(|(a, _)| a), &cfg);

    // Connections cannot outlive the per-connection timeout, so it also
    // bounds the shutdown drain below.
    let drain_timeout = std::time::Duration::from_secs(std::cmp::max(
        cfg.performance.read_timeout,
        cfg.performance.write_timeout,
    ));

    let state = Arc::new(config::AppState::init(cfg)?);

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown));

    let app_connections = Arc::new(AtomicUsize::new(0));
    let upgrade_connections = Arc::new(AtomicUsize::new(0));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async move {
            let upgrade_task = upgrade_listener.map(|(_, listener)| {
                tokio::task::spawn_local(server::run_accept_loop(
                    listener,
                    Arc::clone(&state),
                    Arc::clone(&upgrade_connections),
                    upgrade_role,
                    Arc::clone(&shutdown),
                ))
            });

            server::run_accept_loop(
                app_listener,
                Arc::clone(&state),
                Arc::clone(&app_connections),
                app_role,
                shutdown,
            )
            .await;

            if let Some(task) = upgrade_task {
                if let Err(e) = task.await {
                    logger::log_error(&format!("Upgrade listener task failed: {e}"));
                }
            }

            // Connection tasks are spawned locally; keep the LocalSet alive
            // until they have all finished, or the drain deadline passes.
            if server::wait_for_connections_to_finish(
                &[app_connections, upgrade_connections],
                drain_timeout,
            )
            .await
            {
                logger::log_shutdown("All connections finished");
            }
        })
        .await;

    Ok(())
}
