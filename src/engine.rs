//! # Quiz Engine
//! Glue between the request layer and the pure core: answers + catalog in,
//! coordinate + nearest reference points out. No I/O, no shared state.

use sha2::{Digest, Sha256};

use crate::catalog::ReferenceCatalog;
use crate::quiz::{compute_coordinates, k_nearest, AnswerSet, AxisWeightTable, Coordinate, Neighbor};

/// Result of scoring one answer set against a catalog.
#[derive(Debug, Clone)]
pub struct Evaluation<'a> {
    pub coordinate: Coordinate,
    pub nearest: Vec<Neighbor<'a>>,
}

pub fn evaluate<'a>(
    table: &AxisWeightTable,
    answers: &AnswerSet,
    catalog: &'a ReferenceCatalog,
    k: usize,
) -> Evaluation<'a> {
    let coordinate = compute_coordinates(table, answers);
    let nearest = k_nearest(coordinate, catalog.points(), k);
    Evaluation { coordinate, nearest }
}

/// Short anonymous id for an answer set, safe to put in logs.
pub fn fingerprint(answers: &AnswerSet) -> String {
    let digest = Sha256::digest(answers.canonical().as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::ReferencePoint;

    fn catalog() -> ReferenceCatalog {
        let pts = [
            ("Near-1", -1.00, 0.90),
            ("Near-2", -0.90, 0.90),
            ("Near-3", -1.00, 0.70),
            ("Far-1", 1.00, -1.00),
            ("Far-2", 0.50, 0.00),
        ];
        ReferenceCatalog::new(
            pts.iter()
                .map(|(n, x, y)| ReferencePoint {
                    id: n.to_ascii_lowercase(),
                    name: n.to_string(),
                    x: *x,
                    y: *y,
                    blurb: String::new(),
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn all_a_lands_near_cluster() {
        let answers = (1..=8).fold(AnswerSet::new(), |s, q| s.with(q, "A"));
        let cat = catalog();
        let ev = evaluate(AxisWeightTable::reference(), &answers, &cat, 3);
        assert!((ev.coordinate.x + 1.0).abs() < 1e-9);
        let names: Vec<_> = ev.nearest.iter().map(|n| n.point.name.as_str()).collect();
        assert_eq!(names, ["Near-1", "Near-2", "Near-3"]);
    }

    #[test]
    fn no_answers_scores_from_origin() {
        let cat = catalog();
        let ev = evaluate(AxisWeightTable::reference(), &AnswerSet::new(), &cat, 3);
        assert_eq!(ev.coordinate, Coordinate::ORIGIN);
        let names: Vec<_> = ev.nearest.iter().map(|n| n.point.name.as_str()).collect();
        assert_eq!(names, ["Far-2", "Near-3", "Near-2"]);
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = AnswerSet::new().with(1, "A").with(2, "B");
        let b = AnswerSet::new().with(2, "B").with(1, "A");
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).len(), 12);
        assert_ne!(fingerprint(&a), fingerprint(&AnswerSet::new()));
    }
}
