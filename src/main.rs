//! Quiz Compass — Binary Entrypoint
//! Boots the Axum HTTP server: config, shared state, routes, and `/metrics`.

use quiz_compass::metrics::Metrics;
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    quiz_compass::init_tracing();

    // Recorder first so startup gauges are captured.
    let metrics = Metrics::init()?;

    // A bad weight table or catalog is fatal here, never per-request.
    let router = quiz_compass::app()?.merge(metrics.router());

    Ok(router.into())
}
