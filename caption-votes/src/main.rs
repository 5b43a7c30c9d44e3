use caption_votes::{server, telemetry, AppError, Dependencies, Settings};
use dotenv::dotenv;
use tracing::{error, info};

/// Main entry point for the caption votes server.
///
/// Loads configuration from the environment, wires the store and services
/// and serves the HTTP routes until interrupted.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();

    let settings = Settings::from_env()?;
    telemetry::init_tracing(settings.log_format)?;

    info!(
        service_name = "caption-votes",
        service_version = env!("CARGO_PKG_VERSION"),
        backend = ?settings.store_backend,
        "Starting caption votes server"
    );

    let dependencies = match Dependencies::new(&settings).await {
        Ok(dependencies) => dependencies,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = server::create_app(dependencies.state, &settings);
    server::run_server(app, settings.socket_addr()).await
}
