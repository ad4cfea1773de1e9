//! Per-question scoring and coordinate aggregation.
//!
//! Coordinate per axis = sum(score) / sum(weight) over the answered questions
//! on that axis, then clamped into [-1, 1]. An axis with no answered question
//! is exactly 0.0.

use serde::{Deserialize, Serialize};

use super::answers::{AnswerSet, ChoiceLabel};
use super::axis::{Axis, AxisWeight, AxisWeightTable, ScoringRule};

/// Position on the ideology plane, both components in [-1.0, 1.0].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { x: 0.0, y: 0.0 };

    /// Clamps each component independently.
    pub fn clamped(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }
}

/// Contribution of one choice under a table entry.
pub fn score_entry(entry: &AxisWeight, label: &str) -> f64 {
    let w = entry.weight;
    let choice = ChoiceLabel::parse(label);
    match entry.rule {
        ScoringRule::Linear => match choice {
            ChoiceLabel::A => -w,
            ChoiceLabel::B => w,
            _ => 0.0,
        },
        ScoringRule::LinearSymmetric | ScoringRule::Fallback => match choice {
            ChoiceLabel::A => w,
            ChoiceLabel::B => -w,
            ChoiceLabel::Both => 0.3 * w,
            ChoiceLabel::Other => 0.0,
        },
        ScoringRule::ConvergentBoth => match choice {
            ChoiceLabel::A | ChoiceLabel::B => 0.6 * w,
            ChoiceLabel::Both => w,
            ChoiceLabel::Other => 0.0,
        },
    }
}

/// `score(question, label)`; `None` if the question is not in the table.
pub fn score(table: &AxisWeightTable, question: u32, label: &str) -> Option<f64> {
    table.weight_of(question).map(|entry| score_entry(entry, label))
}

#[derive(Debug, Default, Clone, Copy)]
struct AxisSum {
    total: f64,
    weight: f64,
}

impl AxisSum {
    fn add(&mut self, delta: f64, weight: f64) {
        self.total += delta;
        self.weight += weight;
    }

    fn mean(&self) -> f64 {
        if self.weight > 0.0 {
            self.total / self.weight
        } else {
            0.0
        }
    }
}

/// Aggregate an answer set into a clamped coordinate.
///
/// Absent or empty answers are skipped entirely. A present but unrecognized
/// label scores 0.0 and still adds its weight to the denominator.
pub fn compute_coordinates(table: &AxisWeightTable, answers: &AnswerSet) -> Coordinate {
    let mut x = AxisSum::default();
    let mut y = AxisSum::default();

    for (question, entry) in table.iter() {
        let Some(label) = answers.answer(question) else {
            continue;
        };
        let delta = score_entry(entry, label);
        match entry.axis {
            Axis::X => x.add(delta, entry.weight),
            Axis::Y => y.add(delta, entry.weight),
        }
    }

    Coordinate::clamped(x.mean(), y.mean())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn table() -> &'static AxisWeightTable {
        AxisWeightTable::reference()
    }

    fn all(label: &str) -> AnswerSet {
        (1..=8).fold(AnswerSet::new(), |set, q| set.with(q, label))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn x_axis_linear_rule() {
        let t = table();
        assert!(close(score(t, 1, "A").unwrap(), -1.0));
        assert!(close(score(t, 1, "B").unwrap(), 1.0));
        assert!(close(score(t, 1, "C").unwrap(), 0.0));

        assert!(close(score(t, 5, "A").unwrap(), -0.8));
        assert!(close(score(t, 5, "B").unwrap(), 0.8));
        assert!(close(score(t, 5, "Both").unwrap(), 0.0));
    }

    #[test]
    fn y_axis_symmetric_questions() {
        let t = table();
        for q in [3, 6] {
            let w = t.weight_of(q).unwrap().weight;
            assert!(close(score(t, q, "A").unwrap(), w));
            assert!(close(score(t, q, "B").unwrap(), -w));
            assert!(close(score(t, q, "Both").unwrap(), 0.3 * w));
            assert!(close(score(t, q, "C").unwrap(), 0.0));
        }
    }

    #[test]
    fn y_axis_convergent_question() {
        let t = table();
        let w = t.weight_of(8).unwrap().weight;
        assert!(close(score(t, 8, "A").unwrap(), 0.6 * w));
        assert!(close(score(t, 8, "B").unwrap(), 0.6 * w));
        assert!(close(score(t, 8, "Both").unwrap(), w));
        assert!(close(score(t, 8, "C").unwrap(), 0.0));
    }

    #[test]
    fn y_axis_fallback_matches_symmetric_shape() {
        let mut entries: Vec<_> = table().iter().map(|(q, w)| (q, *w)).collect();
        for q in 9..=98 {
            entries.push((q, AxisWeight::x(1.0)));
        }
        entries.push((99, AxisWeight::y(2.0, ScoringRule::Fallback)));
        let t = AxisWeightTable::new(entries).unwrap();

        assert!(close(score(&t, 99, "A").unwrap(), 2.0));
        assert!(close(score(&t, 99, "B").unwrap(), -2.0));
        assert!(close(score(&t, 99, "Both").unwrap(), 0.6));
        assert!(close(score(&t, 99, "C").unwrap(), 0.0));
    }

    #[test]
    fn unknown_question_has_no_score() {
        assert_eq!(score(table(), 42, "A"), None);
    }

    #[test]
    fn empty_answers_give_origin() {
        let c = compute_coordinates(table(), &AnswerSet::new());
        assert_eq!(c, Coordinate::ORIGIN);
    }

    #[test]
    fn all_a() {
        let c = compute_coordinates(table(), &all("A"));
        assert!(close(c.x, -1.0));
        assert!(close(c.y, 2.28 / 2.6));
    }

    #[test]
    fn all_b() {
        let c = compute_coordinates(table(), &all("B"));
        assert!(close(c.x, 1.0));
        assert!(close(c.y, -1.32 / 2.6));
    }

    #[test]
    fn unknown_label_still_counts_weight() {
        let answers = AnswerSet::new().with(5, "B").with(3, "Both").with(1, "C");
        let c = compute_coordinates(table(), &answers);
        assert!(close(c.x, 0.8 / 1.8));
        assert!(close(c.y, 0.3));
    }

    #[test]
    fn empty_label_is_skipped_not_counted() {
        let present = AnswerSet::new().with(5, "B").with(1, "C");
        let blank = AnswerSet::new().with(5, "B").with(1, "");
        assert!(close(compute_coordinates(table(), &present).x, 0.8 / 1.8));
        assert!(close(compute_coordinates(table(), &blank).x, 1.0));
    }

    #[test]
    fn unanswered_axis_is_exactly_zero() {
        let c = compute_coordinates(table(), &AnswerSet::new().with(6, "A"));
        assert_eq!(c.x, 0.0);
        assert!(close(c.y, 1.0));

        let c = compute_coordinates(table(), &AnswerSet::new().with(1, "A").with(2, "B"));
        assert_eq!(c.y, 0.0);
    }

    #[test]
    fn saturated_answers_stay_in_bounds() {
        let answers = AnswerSet::new()
            .with(1, "B")
            .with(2, "B")
            .with(4, "B")
            .with(5, "B")
            .with(7, "B")
            .with(3, "A")
            .with(6, "A")
            .with(8, "Both");
        let c = compute_coordinates(table(), &answers);
        assert!(close(c.x, 1.0));
        assert!(close(c.y, 1.0));
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let answers = AnswerSet::new().with(2, "A").with(3, "Both").with(8, "B");
        let a = compute_coordinates(table(), &answers);
        let b = compute_coordinates(table(), &answers);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }

    #[test]
    fn clamped_bounds_components_independently() {
        let c = Coordinate::clamped(3.5, -0.25);
        assert_eq!(c, Coordinate { x: 1.0, y: -0.25 });
    }
}
