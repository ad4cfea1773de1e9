// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod questions;
pub mod submissions;

// Pure scoring core (axis table, scorer, nearest-neighbor)
pub mod quiz;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::QuizConfig;
pub use crate::quiz::{
    compute_coordinates, k_nearest, AnswerSet, AxisWeightTable, Coordinate, ReferencePoint,
};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `quiz_compass=info,warn`.
/// `QUIZ_LOG_JSON=1` switches to JSON lines. Uses `try_init`, so a subscriber
/// already installed by the hosting runtime wins.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quiz_compass=info,warn"));
    let json = std::env::var("QUIZ_LOG_JSON").ok().is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

/// Build the full application router from the resolved config
/// (`$QUIZ_CONFIG_PATH`, `config/quiz.toml`, or defaults).
pub fn app() -> anyhow::Result<axum::Router> {
    let cfg = QuizConfig::load_default()?;
    let state = AppState::from_config(&cfg)?;
    Ok(create_router(state))
}
