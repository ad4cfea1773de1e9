//! submissions.rs — bounded in-memory store of scored quiz submissions,
//! optionally mirrored to a JSON-lines log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead as _, BufReader, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::quiz::{AnswerSet, Coordinate};

pub const MAX_CAPACITY: usize = 10_000;

/// One scoring run: what was posted and where it landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSubmission {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub answers: AnswerSet,
    pub x: f64,
    pub y: f64,
}

impl ScoredSubmission {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate { x: self.x, y: self.y }
    }
}

#[derive(Debug)]
pub struct SubmissionStore {
    inner: Mutex<Inner>,
    cap: usize,
    log_path: Option<PathBuf>,
}

#[derive(Debug)]
struct Inner {
    next_id: u64,
    entries: VecDeque<ScoredSubmission>,
}

impl SubmissionStore {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, MAX_CAPACITY);
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                entries: VecDeque::with_capacity(cap),
            }),
            cap,
            log_path: None,
        }
    }

    /// Also append every record as one JSON line to `path`.
    ///
    /// Ids continue after the highest id already in the log, so records
    /// from earlier runs stay unambiguous.
    pub fn with_log(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match last_logged_id(&path) {
            Ok(Some(last)) => {
                let inner = self.inner.get_mut().expect("submission store mutex poisoned");
                inner.next_id = inner.next_id.max(last + 1);
                info!(path = %path.display(), last_id = last, "resuming submission ids from log");
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, path = %path.display(), "could not scan submission log for ids");
            }
        }
        self.log_path = Some(path);
        self
    }

    /// Assign an id, timestamp, and append. Oldest records are evicted past capacity.
    pub fn record(&self, answers: AnswerSet, coordinate: Coordinate) -> ScoredSubmission {
        let mut inner = self.inner.lock().expect("submission store mutex poisoned");

        let sub = ScoredSubmission {
            id: inner.next_id,
            created_at: Utc::now(),
            answers,
            x: coordinate.x,
            y: coordinate.y,
        };
        inner.next_id += 1;

        if let Some(path) = &self.log_path {
            if let Err(e) = append_line(path, &sub) {
                warn!(error = %e, path = %path.display(), id = sub.id, "submission log append failed");
            }
        }

        inner.entries.push_back(sub.clone());
        while inner.entries.len() > self.cap {
            inner.entries.pop_front();
        }
        sub
    }

    pub fn get(&self, id: u64) -> Option<ScoredSubmission> {
        let inner = self.inner.lock().expect("submission store mutex poisoned");
        inner.entries.iter().find(|s| s.id == id).cloned()
    }

    /// Up to `n` most recent records, oldest first.
    pub fn snapshot_last_n(&self, n: usize) -> Vec<ScoredSubmission> {
        let inner = self.inner.lock().expect("submission store mutex poisoned");
        let start = inner.entries.len().saturating_sub(n);
        inner.entries.iter().skip(start).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("submission store mutex poisoned")
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Highest `id` in an existing JSON-lines log; `None` if the file is missing
/// or holds no readable record. Malformed lines are skipped.
fn last_logged_id(path: &Path) -> anyhow::Result<Option<u64>> {
    #[derive(Deserialize)]
    struct IdOnly {
        id: u64,
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut last = None;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<IdOnly>(&line) {
            Ok(rec) => last = last.max(Some(rec.id)),
            Err(e) => warn!(error = %e, path = %path.display(), "skipping malformed submission log line"),
        }
    }
    Ok(last)
}

fn append_line(path: &Path, sub: &ScoredSubmission) -> anyhow::Result<()> {
    let mut line = serde_json::to_string(sub)?;
    line.push('\n');
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    f.write_all(line.as_bytes())?;
    Ok(())
}
