// src/config/quiz.rs
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::quiz::{Axis, AxisWeight, AxisWeightTable, ScoringRule};
use crate::submissions::MAX_CAPACITY;

pub const DEFAULT_CONFIG_PATH: &str = "config/quiz.toml";
pub const ENV_CONFIG_PATH: &str = "QUIZ_CONFIG_PATH";
pub const ENV_NEAREST_K: &str = "QUIZ_NEAREST_K";

fn default_title() -> String {
    "Political Compass".to_string()
}
fn default_nearest_k() -> usize {
    3
}
fn default_catalog_path() -> PathBuf {
    PathBuf::from("config/reference_points.json")
}
fn default_questions_path() -> PathBuf {
    PathBuf::from("config/questions.json")
}
fn default_history_capacity() -> usize {
    2000
}

/// One `[[axis]]` override row.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisEntry {
    pub question: u32,
    pub axis: Axis,
    pub weight: f64,
    /// Y-axis only: "linear_symmetric" | "convergent_both" | "fallback" (default).
    #[serde(default)]
    pub rule: Option<ScoringRule>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_nearest_k")]
    pub nearest_k: usize,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    #[serde(default = "default_questions_path")]
    pub questions_path: PathBuf,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default)]
    pub submissions_log: Option<PathBuf>,
    #[serde(default)]
    pub axis: Vec<AxisEntry>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            nearest_k: default_nearest_k(),
            catalog_path: default_catalog_path(),
            questions_path: default_questions_path(),
            history_capacity: default_history_capacity(),
            submissions_log: None,
            axis: Vec::new(),
        }
    }
}

impl QuizConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading quiz config {}", path.display()))?;
        let mut cfg: QuizConfig = toml::from_str(&data)
            .with_context(|| format!("parsing quiz config {}", path.display()))?;
        cfg.sanitize()?;
        Ok(cfg)
    }

    /// Resolve config location and apply env overrides:
    /// 1) $QUIZ_CONFIG_PATH (must exist)
    /// 2) config/quiz.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        let mut cfg = match env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
                }
                Self::load_from_file(&pb)?
            }
            Err(_) => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load_from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(raw) = env::var(ENV_NEAREST_K) {
            cfg.nearest_k = raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{ENV_NEAREST_K} must be a positive integer, got '{raw}'"))?;
        }
        cfg.sanitize()?;
        Ok(cfg)
    }

    fn sanitize(&mut self) -> Result<()> {
        if self.nearest_k == 0 {
            bail!("nearest_k must be at least 1");
        }
        self.history_capacity = self.history_capacity.clamp(1, MAX_CAPACITY);
        Ok(())
    }

    /// The reference table, or the validated `[[axis]]` override when present.
    pub fn axis_table(&self) -> Result<AxisWeightTable> {
        if self.axis.is_empty() {
            return Ok(AxisWeightTable::reference().clone());
        }
        let entries = self.axis.iter().map(|e| {
            let weight = match e.axis {
                Axis::X => AxisWeight {
                    axis: Axis::X,
                    weight: e.weight,
                    rule: e.rule.unwrap_or(ScoringRule::Linear),
                },
                Axis::Y => AxisWeight::y(e.weight, e.rule.unwrap_or(ScoringRule::Fallback)),
            };
            (e.question, weight)
        });
        AxisWeightTable::new(entries).context("invalid [[axis]] table in quiz config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let mut cfg: QuizConfig = toml::from_str("").unwrap();
        cfg.sanitize().unwrap();
        assert_eq!(cfg.nearest_k, 3);
        assert_eq!(cfg.history_capacity, 2000);
        assert!(cfg.submissions_log.is_none());
        assert_eq!(&cfg.axis_table().unwrap(), AxisWeightTable::reference());
    }

    #[test]
    fn axis_override_defaults_y_to_fallback() {
        let cfg: QuizConfig = toml::from_str(
            r#"
            [[axis]]
            question = 1
            axis = "x"
            weight = 1.0

            [[axis]]
            question = 2
            axis = "y"
            weight = 0.5

            [[axis]]
            question = 3
            axis = "y"
            weight = 0.8
            rule = "convergent_both"
            "#,
        )
        .unwrap();
        let t = cfg.axis_table().unwrap();
        assert_eq!(t.question_count(), 3);
        assert_eq!(t.weight_of(2).unwrap().rule, ScoringRule::Fallback);
        assert_eq!(t.weight_of(3).unwrap().rule, ScoringRule::ConvergentBoth);
    }

    #[test]
    fn malformed_axis_override_is_rejected() {
        let cfg: QuizConfig = toml::from_str(
            r#"
            [[axis]]
            question = 2
            axis = "x"
            weight = 1.0
            "#,
        )
        .unwrap();
        assert!(cfg.axis_table().is_err());
    }

    #[test]
    fn zero_k_is_rejected() {
        let mut cfg: QuizConfig = toml::from_str("nearest_k = 0").unwrap();
        assert!(cfg.sanitize().is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<QuizConfig>("nearest = 3").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_CONFIG_PATH);
        env::remove_var(ENV_NEAREST_K);

        // No files in the temp CWD: built-in defaults
        let cfg = QuizConfig::load_default().unwrap();
        assert_eq!(cfg.nearest_k, 3);

        // Env path wins, env k overrides the file
        let p = tmp.path().join("custom.toml");
        fs::write(&p, "title = \"Custom\"\nnearest_k = 5\n").unwrap();
        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        assert_eq!(QuizConfig::load_default().unwrap().nearest_k, 5);
        env::set_var(ENV_NEAREST_K, "2");
        let cfg = QuizConfig::load_default().unwrap();
        assert_eq!((cfg.title.as_str(), cfg.nearest_k), ("Custom", 2));

        env::set_var(ENV_NEAREST_K, "zero");
        assert!(QuizConfig::load_default().is_err());
        env::remove_var(ENV_NEAREST_K);

        env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
        assert!(QuizConfig::load_default().is_err());
        env::remove_var(ENV_CONFIG_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
