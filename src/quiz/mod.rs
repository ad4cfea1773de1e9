// src/quiz/mod.rs
//! Pure quiz core: weight table, scorer, nearest-neighbor selection.
//! No I/O here; everything is deterministic over its inputs.

pub mod answers;
pub mod axis;
pub mod nearest;
pub mod scoring;

pub use answers::{question_key, AnswerSet, ChoiceLabel};
pub use axis::{Axis, AxisWeight, AxisWeightTable, ScoringRule};
pub use nearest::{k_nearest, Neighbor, ReferencePoint};
pub use scoring::{compute_coordinates, score, score_entry, Coordinate};
