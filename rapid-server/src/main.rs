use rapid_server::middleware::{ApiRateLimiter, ErrorLogWriter};
use rapid_server::{AppState, ServerResult, build_router};

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::LevelFilter;
use rapid_config::{Config, LoggingConfig};
use rapid_log::{Level, LoggerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ServerResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let logger = rapid_log::init(logger_config_from(&config.logging))?;
    if rapid_log::install_log_bridge(*config.logging.level).is_ok() {
        config.log_summary();
    }

    let error_log = ErrorLogWriter::open(Path::new(&config.logging.dir))?;
    let state = AppState {
        logger: logger.clone(),
        limiter: Arc::new(ApiRateLimiter::new(&config.rate_limit)),
        error_log,
    };

    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    logger.info(format!("server listening on {}", listener.local_addr()?));

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    rapid_log::info("server stopped");
    rapid_log::shutdown()?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        rapid_log::error(format!("failed to listen for shutdown signal: {e}"));
        return;
    }
    rapid_log::info("shutdown signal received");
}

fn logger_config_from(logging: &LoggingConfig) -> LoggerConfig {
    LoggerConfig {
        dir: PathBuf::from(&logging.dir),
        max_size: logging.max_size_mb * 1024 * 1024,
        max_backups: logging.max_backups,
        max_age_days: logging.max_age_days,
        compress: logging.compress,
        buffer_size: logging.buffer_size,
        colored: logging.colored,
        min_level: min_level_from(*logging.level),
    }
}

fn min_level_from(filter: LevelFilter) -> Level {
    match filter {
        LevelFilter::Trace | LevelFilter::Debug => Level::Debug,
        LevelFilter::Info => Level::Info,
        LevelFilter::Warn => Level::Warn,
        LevelFilter::Error => Level::Error,
        // Off silences everything below process-fatal
        LevelFilter::Off => Level::Fatal,
    }
}
