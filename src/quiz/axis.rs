//! # Axis Weight Table
//!
//! Maps each question number to the ideology axis it moves, its weight, and
//! the scoring rule used to turn a choice label into a contribution.
//!
//! - The reference quiz has 8 questions: five on X, three on Y.
//! - Weights are both the contribution scale and the normalization denominator.
//! - Question numbers outside `1..=N` have no entry; lookups return `None`.
//!
//! The table is built once (reference content or validated config) and then
//! shared read-only for the lifetime of the process.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One of the two orthogonal ideology dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Economic: -1.0 left .. +1.0 right.
    X,
    /// Social: -1.0 authoritarian .. +1.0 libertarian.
    Y,
}

/// Named response curve for a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    /// X-axis default: A pulls left, B pulls right, nothing else counts.
    Linear,
    /// Y-axis: A up, B down, Both a mild lean up.
    LinearSymmetric,
    /// Y-axis: either single choice is a mild signal, Both reinforces.
    ConvergentBoth,
    /// Y-axis question without an explicit rule; scored like `LinearSymmetric`.
    Fallback,
}

/// Immutable table entry for one question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisWeight {
    pub axis: Axis,
    pub weight: f64,
    pub rule: ScoringRule,
}

impl AxisWeight {
    pub const fn x(weight: f64) -> Self {
        Self {
            axis: Axis::X,
            weight,
            rule: ScoringRule::Linear,
        }
    }

    pub const fn y(weight: f64, rule: ScoringRule) -> Self {
        Self {
            axis: Axis::Y,
            weight,
            rule,
        }
    }
}

/// Question number -> axis entry, covering exactly `1..=N`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisWeightTable {
    entries: BTreeMap<u32, AxisWeight>,
}

static REFERENCE: Lazy<AxisWeightTable> = Lazy::new(|| {
    let entries = [
        (1, AxisWeight::x(1.0)),
        (2, AxisWeight::x(1.0)),
        (3, AxisWeight::y(1.0, ScoringRule::LinearSymmetric)),
        (4, AxisWeight::x(1.0)),
        (5, AxisWeight::x(0.8)),
        (6, AxisWeight::y(0.8, ScoringRule::LinearSymmetric)),
        (7, AxisWeight::x(0.8)),
        (8, AxisWeight::y(0.8, ScoringRule::ConvergentBoth)),
    ];
    AxisWeightTable {
        entries: entries.into_iter().collect(),
    }
});

impl AxisWeightTable {
    /// The 8-question table of the reference quiz.
    pub fn reference() -> &'static AxisWeightTable {
        &REFERENCE
    }

    /// Build a table from arbitrary entries, rejecting malformed content.
    ///
    /// Rules checked:
    /// - numbering is exactly `1..=N` (no gaps, no duplicates, N >= 1)
    /// - weights are finite and strictly positive
    /// - X entries use `Linear`; Y entries never do
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, AxisWeight)>,
    {
        let mut map = BTreeMap::new();
        for (q, w) in entries {
            if map.insert(q, w).is_some() {
                bail!("axis table: question {q} is defined twice");
            }
        }
        if map.is_empty() {
            bail!("axis table: no questions defined");
        }
        for (expected, (&q, w)) in (1u32..).zip(map.iter()) {
            if q != expected {
                bail!("axis table: questions must be numbered 1..=N, missing {expected}");
            }
            if !w.weight.is_finite() || w.weight <= 0.0 {
                bail!("axis table: question {q} has invalid weight {}", w.weight);
            }
            match (w.axis, w.rule) {
                (Axis::X, ScoringRule::Linear) => {}
                (Axis::X, rule) => {
                    bail!("axis table: X-axis question {q} cannot use rule {rule:?}")
                }
                (Axis::Y, ScoringRule::Linear) => {
                    bail!("axis table: Y-axis question {q} cannot use the linear X rule")
                }
                (Axis::Y, _) => {}
            }
        }
        Ok(Self { entries: map })
    }

    /// Lookup for `question` in `1..=N`; `None` outside the domain.
    pub fn weight_of(&self, question: u32) -> Option<&AxisWeight> {
        self.entries.get(&question)
    }

    /// N: the highest question number (entries cover `1..=N`).
    pub fn question_count(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &AxisWeight)> + '_ {
        self.entries.iter().map(|(&q, w)| (q, w))
    }
}
