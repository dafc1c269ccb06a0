mod telemetry;

use std::error::Error;

use tracing::{error, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; variables may come from the environment.
    let dotenv = dotenvy::dotenv();

    telemetry::init()?;

    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!(error = %err, "failed to read .env file");
        }
    }

    if let Err(err) = api::start().await {
        error!(error = %err, "review bridge stopped with an error");
        return Err(err.into());
    }

    Ok(())
}
