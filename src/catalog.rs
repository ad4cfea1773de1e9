//! # Reference Catalog
//!
//! The named points submissions are compared against, loaded from a JSON
//! array of `{id, name, x, y, blurb}` objects.
//!
//! - Missing file → built-in `default_seed()` (logged at `warn`).
//! - Unreadable or malformed file → error; callers treat it as fatal at boot
//!   and as "keep the old catalog" on reload.
//! - Coordinates must be finite; ids must be unique.

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::{fs, io, path::Path};
use tracing::{info, warn};

use crate::quiz::ReferencePoint;

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCatalog {
    points: Vec<ReferencePoint>,
}

impl ReferenceCatalog {
    pub fn new(points: Vec<ReferencePoint>) -> Result<Self> {
        let mut seen = HashSet::new();
        for p in &points {
            if !p.x.is_finite() || !p.y.is_finite() {
                bail!("reference point '{}' has non-finite coordinates", p.id);
            }
            if !seen.insert(p.id.as_str()) {
                bail!("reference point id '{}' is duplicated", p.id);
            }
        }
        Ok(Self { points })
    }

    /// Load from JSON; falls back to the seed only when the file does not exist.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "reference catalog not found; using built-in seed");
                return Ok(Self::default_seed());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading catalog {}", path.display()))
            }
        };
        let points: Vec<ReferencePoint> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        let catalog = Self::new(points)?;
        info!(path = %path.display(), points = catalog.len(), "reference catalog loaded");
        Ok(catalog)
    }

    pub fn points(&self) -> &[ReferencePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Built-in archetypes, one per quadrant plus the centre and the axis extremes.
    pub(crate) fn default_seed() -> Self {
        let points = [
            ("centrist", "Centrist", 0.0, 0.0, "Balances both axes."),
            ("left-libertarian", "Left Libertarian", -0.7, 0.7, "Egalitarian economics, broad personal freedom."),
            ("right-libertarian", "Right Libertarian", 0.7, 0.7, "Free markets, minimal state."),
            ("left-authoritarian", "Left Authoritarian", -0.7, -0.7, "Planned economy, strong state."),
            ("right-authoritarian", "Right Authoritarian", 0.7, -0.7, "Markets under a strong, ordered state."),
            ("social-democrat", "Social Democrat", -0.5, 0.2, "Regulated markets with a wide safety net."),
            ("conservative", "Conservative", 0.5, -0.3, "Tradition, order, and market economics."),
            ("classical-liberal", "Classical Liberal", 0.4, 0.4, "Rule of law, limited government."),
        ]
        .into_iter()
        .map(|(id, name, x, y, blurb)| ReferencePoint {
            id: id.to_string(),
            name: name.to_string(),
            x,
            y,
            blurb: blurb.to_string(),
        })
        .collect();
        Self { points }
    }
}
