use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use greetd::{Config, Readiness, Server, app};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    let readiness = Readiness::new();
    let router = app::router(readiness.clone(), config.request_id(), config.access_log());

    let served = Server::bind(config.listen_addr)
        .readiness(readiness)
        .shutdown_timeout(config.shutdown_timeout())
        .serve(router)
        .await;

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
