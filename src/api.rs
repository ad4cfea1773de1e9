use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::catalog::ReferenceCatalog;
use crate::config::QuizConfig;
use crate::engine::{self, Evaluation};
use crate::metrics;
use crate::questions::{Question, QuestionBank};
use crate::quiz::{AnswerSet, AxisWeight, AxisWeightTable};
use crate::submissions::{ScoredSubmission, SubmissionStore};

#[derive(Clone)]
pub struct AppState {
    title: Arc<str>,
    table: Arc<AxisWeightTable>,
    catalog: Arc<RwLock<ReferenceCatalog>>,
    catalog_path: Arc<PathBuf>,
    questions: Arc<QuestionBank>,
    submissions: Arc<SubmissionStore>,
    nearest_k: usize,
}

impl AppState {
    /// Build everything the router needs. Any error here is a configuration
    /// defect and should abort startup.
    pub fn from_config(cfg: &QuizConfig) -> Result<Self> {
        let table = cfg.axis_table()?;
        let catalog = ReferenceCatalog::load_from_file(&cfg.catalog_path)?;
        let questions = QuestionBank::load_from_file(&cfg.questions_path)?;

        if questions.len() as u32 != table.question_count() {
            warn!(
                questions = questions.len(),
                scored = table.question_count(),
                "question bank and axis table differ in size"
            );
        }

        let mut store = SubmissionStore::with_capacity(cfg.history_capacity);
        if let Some(log) = &cfg.submissions_log {
            store = store.with_log(log);
        }

        metrics::set_reference_points(catalog.len());
        info!(
            questions = table.question_count(),
            reference_points = catalog.len(),
            k = cfg.nearest_k,
            "quiz state ready"
        );

        Ok(Self {
            title: Arc::from(cfg.title.as_str()),
            table: Arc::new(table),
            catalog: Arc::new(RwLock::new(catalog)),
            catalog_path: Arc::new(cfg.catalog_path.clone()),
            questions: Arc::new(questions),
            submissions: Arc::new(store),
            nearest_k: cfg.nearest_k,
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/", get(index))
        .route("/test", get(take))
        .route("/score", post(score_form).get(score_wrong_method))
        .route("/api/score", post(score_json))
        .route("/submissions/{id}", get(get_submission))
        .route("/debug/submissions", get(debug_submissions))
        .route("/debug/weights", get(debug_weights))
        .route("/admin/reload-catalog", post(admin_reload_catalog))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct IndexOut {
    title: String,
    questions: u32,
    nearest_k: usize,
}

async fn index(State(state): State<AppState>) -> Json<IndexOut> {
    Json(IndexOut {
        title: state.title.to_string(),
        questions: state.table.question_count(),
        nearest_k: state.nearest_k,
    })
}

#[derive(serde::Serialize)]
struct TakeOut {
    questions: Vec<Question>,
}

async fn take(State(state): State<AppState>) -> Json<TakeOut> {
    Json(TakeOut {
        questions: state.questions.questions().to_vec(),
    })
}

#[derive(serde::Serialize)]
struct NeighborOut {
    id: String,
    name: String,
    x: f64,
    y: f64,
    blurb: String,
    distance: f64,
}

#[derive(serde::Serialize)]
struct ScoreOut {
    submission: ScoredSubmission,
    x: f64,
    y: f64,
    nearest: Vec<NeighborOut>,
}

async fn score_form(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Json<ScoreOut> {
    Json(score_and_record(&state, &fields))
}

async fn score_json(
    State(state): State<AppState>,
    Json(fields): Json<HashMap<String, String>>,
) -> Json<ScoreOut> {
    Json(score_and_record(&state, &fields))
}

async fn score_wrong_method() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, "Use POST")
}

/// Extract `q1..qN`, run the core, persist the record, shape the response.
fn score_and_record(state: &AppState, fields: &HashMap<String, String>) -> ScoreOut {
    let started = Instant::now();
    let answers = AnswerSet::from_form(fields, state.table.question_count());

    let (coordinate, nearest) = {
        let catalog = state.catalog.read().expect("rwlock poisoned");
        let Evaluation {
            coordinate,
            nearest,
        } = engine::evaluate(&state.table, &answers, &catalog, state.nearest_k);
        let nearest = nearest
            .into_iter()
            .map(|n| NeighborOut {
                id: n.point.id.clone(),
                name: n.point.name.clone(),
                x: n.point.x,
                y: n.point.y,
                blurb: n.point.blurb.clone(),
                distance: n.distance,
            })
            .collect::<Vec<_>>();
        (coordinate, nearest)
    };

    let fingerprint = engine::fingerprint(&answers);
    let answered = answers.answered();
    let submission = state.submissions.record(answers, coordinate);

    metrics::record_submission(started.elapsed().as_secs_f64() * 1000.0);
    info!(
        id = submission.id,
        %fingerprint,
        answered,
        x = coordinate.x,
        y = coordinate.y,
        nearest = ?nearest.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
        "submission scored"
    );

    ScoreOut {
        submission,
        x: coordinate.x,
        y: coordinate.y,
        nearest,
    }
}

async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ScoredSubmission>, (StatusCode, String)> {
    state
        .submissions
        .get(id)
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("submission {id} not found")))
}

async fn debug_submissions(State(state): State<AppState>) -> Json<Vec<ScoredSubmission>> {
    Json(state.submissions.snapshot_last_n(10))
}

#[derive(serde::Serialize)]
struct WeightOut {
    question: u32,
    #[serde(flatten)]
    weight: AxisWeight,
}

async fn debug_weights(State(state): State<AppState>) -> Json<Vec<WeightOut>> {
    Json(
        state
            .table
            .iter()
            .map(|(question, w)| WeightOut {
                question,
                weight: *w,
            })
            .collect(),
    )
}

async fn admin_reload_catalog(State(state): State<AppState>) -> (StatusCode, String) {
    let fresh = match ReferenceCatalog::load_from_file(state.catalog_path.as_path()) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "catalog reload failed; keeping previous catalog");
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("failed: {e:#}"));
        }
    };
    let n = fresh.len();
    match state.catalog.write() {
        Ok(mut w) => {
            *w = fresh;
            metrics::set_reference_points(n);
            info!(reference_points = n, "catalog reloaded");
            (StatusCode::OK, format!("reloaded {n} reference points"))
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed: lock poisoned".to_string(),
        ),
    }
}
