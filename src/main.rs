use log::{error, info, LevelFilter};
use thiserror::Error;

/// Where to read the log4rs config from unless `LOG_CONFIG` says otherwise.
const DEFAULT_LOG_CONFIG: &str = "log4rs.yaml";

/// Failures that take the whole server down.
#[derive(Debug, Error)]
enum Error {
    #[error("Server failed to start or crashed: {0}")]
    Rocket(#[from] rocket::Error),
}

async fn serve() -> Result<(), Error> {
    let rocket = voter_guide_backend::build().ignite().await?;
    info!("Fairings attached, store and config ready");
    // Rocket's own logging is noisy once the server is up.
    log4rs_dynamic_filters::DynamicLevelFilter::set("rocket", LevelFilter::Off);
    rocket.launch().await?;
    Ok(())
}

#[rocket::main]
async fn main() {
    let log_config = std::env::var("LOG_CONFIG").unwrap_or_else(|_| DEFAULT_LOG_CONFIG.to_string());
    log4rs::init_file(&log_config, log4rs_dynamic_filters::default_deserializers())
        .expect("Failed to initialise logging");
    info!("Logging configured from {log_config}");

    if let Err(err) = serve().await {
        error!("{err}");
        std::process::exit(1)
    }
}
