//! Answer sets keyed by question number.
//!
//! On the wire (forms, JSON, the submission log) answers are keyed `"q1"`..`"qN"`.
//! Keys that are not `q<number>` are dropped on the way in.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Recognized choice labels. Anything else scores as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceLabel {
    A,
    B,
    Both,
    Other,
}

impl ChoiceLabel {
    /// Exact, case-sensitive match.
    pub fn parse(label: &str) -> Self {
        match label {
            "A" => Self::A,
            "B" => Self::B,
            "Both" => Self::Both,
            _ => Self::Other,
        }
    }
}

/// Raw answers for one quiz submission.
///
/// Empty labels are kept (so the stored record mirrors what was posted) but
/// are treated as unanswered by [`AnswerSet::answer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "HashMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct AnswerSet {
    answers: BTreeMap<u32, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and callers assembling answers by hand.
    pub fn with(mut self, question: u32, label: impl Into<String>) -> Self {
        self.answers.insert(question, label.into());
        self
    }

    /// Collect `q1..=qN` from submitted form fields; missing keys become `""`.
    pub fn from_form(fields: &HashMap<String, String>, question_count: u32) -> Self {
        let answers = (1..=question_count)
            .map(|q| {
                let label = fields.get(&question_key(q)).cloned().unwrap_or_default();
                (q, label)
            })
            .collect();
        Self { answers }
    }

    /// The chosen label for `question`, or `None` if absent or empty.
    pub fn answer(&self, question: u32) -> Option<&str> {
        self.answers
            .get(&question)
            .map(String::as_str)
            .filter(|label| !label.is_empty())
    }

    /// Number of non-empty answers.
    pub fn answered(&self) -> usize {
        self.answers.values().filter(|l| !l.is_empty()).count()
    }

    /// Stable textual form, used for fingerprinting in logs.
    pub fn canonical(&self) -> String {
        self.answers
            .iter()
            .map(|(q, l)| format!("{}={}", question_key(*q), l))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// `3` -> `"q3"`.
pub fn question_key(question: u32) -> String {
    format!("q{question}")
}

/// Inverse of [`question_key`]; only the canonical spelling round-trips,
/// so `"q01"` and `"q+1"` are rejected.
fn parse_question_key(key: &str) -> Option<u32> {
    let question: u32 = key.strip_prefix('q')?.parse().ok()?;
    (key == question_key(question)).then_some(question)
}

impl From<HashMap<String, String>> for AnswerSet {
    fn from(raw: HashMap<String, String>) -> Self {
        let answers = raw
            .into_iter()
            .filter_map(|(k, v)| parse_question_key(&k).map(|q| (q, v)))
            .collect();
        Self { answers }
    }
}

impl From<AnswerSet> for BTreeMap<String, String> {
    fn from(set: AnswerSet) -> Self {
        set.answers
            .into_iter()
            .map(|(q, l)| (question_key(q), l))
            .collect()
    }
}
