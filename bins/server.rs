use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> std::process::ExitCode {
    // .env first so RUST_LOG, CONFIG_PATH and DB_PATH are visible
    dotenv().ok();

    // config.toml when present, environment otherwise; a broken file stops here
    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            // no config yet, so log with the default format
            common::utils::logging::init_logging_default();
            error!(service = "taskboard", event = "config_invalid", error = %e, "invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    // shared logging setup, format from [logging]
    common::utils::logging::init_logging_with_format(&cfg.logging.format);
    info!(service = "taskboard", event = "logger_init", format = %cfg.logging.format, "tracing subscriber initialized");

    // instance context for lifecycle events
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // panics go to the log instead of only stderr
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "taskboard",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    // runtime sized by server.worker_threads / TOKIO_WORKER_THREADS
    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "taskboard", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    // start event
    info!(
        service = "taskboard",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        db = %cfg.storage.path.display(),
        "taskboard server starting"
    );

    // serve in its own task and race it against Ctrl+C
    rt.block_on(async move {
        let server_task = tokio::spawn(async move {
            if let Err(e) = server::run_with_config(cfg).await {
                error!(service = "taskboard", event = "run_failed", error = %format!("{e:#}"), "server exited with error");
                Err(e)
            } else {
                Ok(())
            }
        });

        tokio::select! {
            res = server_task => {
                match res {
                    Ok(Ok(())) => {
                        info!(service = "taskboard", event = "stop", %service_id, pid, "server stopped normally");
                        std::process::ExitCode::SUCCESS
                    }
                    // already logged inside the task
                    Ok(Err(_)) => std::process::ExitCode::FAILURE,
                    Err(e) => {
                        error!(service = "taskboard", event = "task_join_error", error = %e, "server task join error");
                        std::process::ExitCode::FAILURE
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                // saves go through a temp file and rename; an interrupted
                // save leaves the previous document in place
                info!(service = "taskboard", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                std::process::ExitCode::SUCCESS
            }
        }
    })
}
