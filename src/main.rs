use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, ServerConfig};

/// Main entry point for the FHIR transformation service
///
/// Serves the REST API that the integration engine posts decoded HL7 patient records to.
///
/// # Environment Variables
/// - `PORT`: listen port on all interfaces (default: 3000)
/// - `PATIENT_ID_STRATEGY`: `timestamp` (default) or `uuid`, for records without a patientId
/// - `RUST_LOG`: tracing filter, added to the default `fhir_bridge=info,api_rest=info`
///
/// # Returns
/// * `Ok(())` - once the server has shut down after Ctrl-C
/// * `Err(anyhow::Error)` - if configuration is invalid or the listener cannot be bound
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fhir_bridge=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServerConfig::from_env_values(
        std::env::var("PORT").ok(),
        std::env::var("PATIENT_ID_STRATEGY").ok(),
    )?;
    let addr = cfg.bind_addr();

    tracing::info!("++ Starting FHIR transformation service on {}", addr);
    tracing::info!(
        "++ Endpoint: POST /fhir/Patient (fallback ids: {:?})",
        cfg.id_strategy()
    );

    let app = api_rest::router(AppState::from_config(&cfg));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- FHIR transformation service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
