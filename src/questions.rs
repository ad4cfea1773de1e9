//! Question bank: the quiz text shown to takers, ordered by `order`.
//! Scoring never reads this; it only needs the axis table.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, io, path::Path};
use tracing::warn;

/// Labels a choice may carry.
pub const CHOICE_LABELS: [&str; 4] = ["A", "B", "Both", "Neither"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub order: u32,
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Sorts by `order` (stable) and checks labels.
    pub fn new(mut questions: Vec<Question>) -> Result<Self> {
        for q in &questions {
            let mut seen = HashSet::new();
            for c in &q.choices {
                if !CHOICE_LABELS.contains(&c.label.as_str()) {
                    bail!("question {}: unknown choice label '{}'", q.order, c.label);
                }
                if !seen.insert(c.label.as_str()) {
                    bail!("question {}: choice label '{}' repeated", q.order, c.label);
                }
            }
        }
        questions.sort_by_key(|q| q.order);
        Ok(Self { questions })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "question bank not found; using built-in seed");
                return Ok(Self::default_seed());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading questions {}", path.display()))
            }
        };
        let questions: Vec<Question> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing questions {}", path.display()))?;
        Self::new(questions)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub(crate) fn default_seed() -> Self {
        let seed: [(&str, &str, &str); 8] = [
            ("Who should set prices for most goods?", "Government planning", "Open markets"),
            ("Should essential utilities be publicly owned?", "Yes, publicly owned", "No, privately run"),
            ("How should speech be regulated?", "Lightly, by courts only", "Actively, by the state"),
            ("How progressive should taxation be?", "Strongly progressive", "Flat and low"),
            ("What should trade policy favour?", "Protect domestic workers", "Free trade"),
            ("Should personal drug use be a crime?", "No, a private choice", "Yes, strictly enforced"),
            ("What is the role of labour unions?", "Expand their power", "Limit their power"),
            ("Which should limit surveillance?", "Independent courts", "Elected legislatures"),
        ];
        let questions = seed
            .into_iter()
            .zip(1u32..)
            .map(|((text, a, b), order)| Question {
                order,
                text: text.to_string(),
                choices: vec![
                    Choice { label: "A".into(), text: a.into() },
                    Choice { label: "B".into(), text: b.into() },
                    Choice { label: "Both".into(), text: "Both".into() },
                    Choice { label: "Neither".into(), text: "Neither".into() },
                ],
            })
            .collect();
        Self { questions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(order: u32, labels: &[&str]) -> Question {
        Question {
            order,
            text: format!("Q{order}?"),
            choices: labels
                .iter()
                .map(|l| Choice { label: l.to_string(), text: format!("{l} choice") })
                .collect(),
        }
    }

    #[test]
    fn sorted_by_order() {
        let bank = QuestionBank::new(vec![q(3, &["A"]), q(1, &["A", "B"]), q(2, &[])]).unwrap();
        let orders: Vec<u32> = bank.questions().iter().map(|q| q.order).collect();
        assert_eq!(orders, [1, 2, 3]);
    }

    #[test]
    fn rejects_repeated_or_unknown_labels() {
        assert!(QuestionBank::new(vec![q(1, &["A", "A"])]).is_err());
        assert!(QuestionBank::new(vec![q(1, &["C"])]).is_err());
    }

    #[test]
    fn empty_bank_is_allowed() {
        let bank = QuestionBank::new(Vec::new()).unwrap();
        assert!(bank.is_empty());
    }

    #[test]
    fn seed_covers_reference_quiz() {
        let seed = QuestionBank::default_seed();
        assert_eq!(seed.len(), 8);
        assert!(QuestionBank::new(seed.questions().to_vec()).is_ok());
    }
}
