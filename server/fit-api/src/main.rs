//! Binary entrypoint for the fit API.

use std::net::SocketAddr;
use std::sync::Arc;

use fit_api::AppState;
use fit_engine::{telemetry, Engine, EngineConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init(telemetry::DEFAULT_FILTER)?;

  let port: u16 = std::env::var("PORT")
    .unwrap_or_else(|_| "5005".into())
    .parse()
    .map_err(|e| format!("PORT must be a valid u16: {}", e))?;

  let state = Arc::new(AppState::new(Engine::new(EngineConfig::from_env())));
  let app = fit_api::app(state);

  let addr = SocketAddr::from(([127, 0, 0, 1], port));
  tracing::info!(%addr, "fit-api listening");

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
