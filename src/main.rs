use qa_agent::config::loader::load_from_env;
use qa_agent::lifecycle::{self, Shutdown};
use qa_agent::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging is not up yet; config errors go to stderr via the returned error.
    let config = load_from_env()?;

    let _telemetry = observability::init(&config.service, &config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        service = %config.service.name,
        port = config.listener.port,
        llm = ?config.llm,
        "qa-agent starting"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    lifecycle::serve(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
