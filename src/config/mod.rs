pub mod quiz;

pub use quiz::{AxisEntry, QuizConfig};
