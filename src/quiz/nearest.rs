//! k-nearest reference points by Euclidean distance.

use serde::{Deserialize, Serialize};

use super::scoring::Coordinate;

/// A named point on the ideology plane used for comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub blurb: String,
}

/// A selected point and its distance from the query coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub point: &'a ReferencePoint,
    pub distance: f64,
}

/// The `min(k, points.len())` closest points, nearest first.
///
/// Uses a stable sort, so equal distances keep their catalog order.
pub fn k_nearest<'a>(
    coordinate: Coordinate,
    points: &'a [ReferencePoint],
    k: usize,
) -> Vec<Neighbor<'a>> {
    let mut ranked = points
        .iter()
        .map(|point| Neighbor {
            point,
            distance: coordinate.distance_to(point.x, point.y),
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(k);
    ranked
}
