//! Plan storage.
//!
//! [`PlanStore`] is the seam the persister writes through. [`JsonPlanStore`]
//! keeps the stored plan rows and the workout log that depends on them in a
//! single JSON document, read under a shared lock and replaced atomically on
//! commit.

use crate::types::ExerciseRow;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// A plan row as written to storage
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StoredRow {
    pub routine: String,
    pub exercise: String,
    pub sets: u32,
    pub min_rep_range: u32,
    pub max_rep_range: u32,
    pub rir: u32,
    pub rpe: f64,
    pub weight: f64,
    pub exercise_order: u32,
}

impl From<&ExerciseRow> for StoredRow {
    fn from(row: &ExerciseRow) -> Self {
        StoredRow {
            routine: row.routine.clone(),
            exercise: row.exercise.clone(),
            sets: row.sets,
            min_rep_range: row.min_rep_range,
            max_rep_range: row.max_rep_range,
            rir: row.rir,
            rpe: row.rpe,
            weight: row.weight,
            exercise_order: row.exercise_order,
        }
    }
}

/// A performed workout, tied to a routine by name
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutLogEntry {
    pub id: Uuid,
    pub routine: String,
    pub exercise: String,
    pub performed_at: DateTime<Utc>,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    #[serde(default)]
    pub rir: Option<u32>,
}

impl WorkoutLogEntry {
    pub fn new(
        routine: impl Into<String>,
        exercise: impl Into<String>,
        sets: u32,
        reps: u32,
        weight: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            routine: routine.into(),
            exercise: exercise.into(),
            performed_at: Utc::now(),
            sets,
            reps,
            weight,
            rir: None,
        }
    }
}

/// Storage collaborator for generated plans
pub trait PlanStore {
    /// Distinct routine names currently stored
    fn routine_names(&self) -> Result<BTreeSet<String>>;

    /// Highest exercise_order across all stored rows, 0 when empty
    fn max_exercise_order(&self) -> Result<u32>;

    /// Remove every row of the named routines along with their log entries.
    /// Returns the number of plan rows removed.
    fn delete_routines(&mut self, routines: &[String]) -> Result<usize>;

    /// Insert one plan row
    fn insert_row(&mut self, row: StoredRow) -> Result<()>;

    /// Make all changes durable
    fn commit(&mut self) -> Result<()>;
}

/// On-disk document layout
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct PlanDocument {
    #[serde(default)]
    pub workout_plan: Vec<StoredRow>,
    #[serde(default)]
    pub workout_log: Vec<WorkoutLogEntry>,
}

/// JSON file backed plan store
pub struct JsonPlanStore {
    path: PathBuf,
    document: PlanDocument,
}

impl JsonPlanStore {
    /// Open the store, reading the current document under a shared lock.
    ///
    /// A missing file is an empty store. A corrupt file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::info!("No plan store at {:?}, starting empty", path);
            return Ok(Self {
                path,
                document: PlanDocument::default(),
            });
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let document = if contents.trim().is_empty() {
            PlanDocument::default()
        } else {
            serde_json::from_str(&contents).map_err(|e| {
                Error::Persistence(format!("Plan store {:?} is corrupt: {}", path, e))
            })?
        };

        tracing::debug!(
            "Opened plan store {:?} ({} rows, {} log entries)",
            path,
            document.workout_plan.len(),
            document.workout_log.len()
        );
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> &[StoredRow] {
        &self.document.workout_plan
    }

    /// Stored rows of one routine in exercise order
    pub fn routine_rows(&self, routine: &str) -> Vec<&StoredRow> {
        let mut rows: Vec<_> = self
            .document
            .workout_plan
            .iter()
            .filter(|r| r.routine == routine)
            .collect();
        rows.sort_by_key(|r| r.exercise_order);
        rows
    }

    pub fn log(&self) -> &[WorkoutLogEntry] {
        &self.document.workout_log
    }

    /// Record a performed workout against a stored routine
    pub fn append_log(&mut self, entry: WorkoutLogEntry) -> Result<()> {
        if !self.document.workout_plan.iter().any(|r| r.routine == entry.routine) {
            return Err(Error::Persistence(format!(
                "No stored routine named '{}'",
                entry.routine
            )));
        }
        self.document.workout_log.push(entry);
        Ok(())
    }
}

impl PlanStore for JsonPlanStore {
    fn routine_names(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .document
            .workout_plan
            .iter()
            .map(|r| r.routine.clone())
            .collect())
    }

    fn max_exercise_order(&self) -> Result<u32> {
        Ok(self
            .document
            .workout_plan
            .iter()
            .map(|r| r.exercise_order)
            .max()
            .unwrap_or(0))
    }

    fn delete_routines(&mut self, routines: &[String]) -> Result<usize> {
        let before = self.document.workout_plan.len();
        self.document
            .workout_plan
            .retain(|r| !routines.contains(&r.routine));
        let removed = before - self.document.workout_plan.len();

        let log_before = self.document.workout_log.len();
        self.document
            .workout_log
            .retain(|e| !routines.contains(&e.routine));
        let log_removed = log_before - self.document.workout_log.len();

        tracing::info!(
            "Deleted {} plan rows and {} log entries for {:?}",
            removed,
            log_removed,
            routines
        );
        Ok(removed)
    }

    fn insert_row(&mut self, row: StoredRow) -> Result<()> {
        if row.routine.trim().is_empty() || row.exercise.trim().is_empty() {
            return Err(Error::Persistence("Row has empty routine or exercise".into()));
        }
        if row.sets == 0 {
            return Err(Error::Persistence(format!("'{}' has zero sets", row.exercise)));
        }
        if row.min_rep_range > row.max_rep_range {
            return Err(Error::Persistence(format!(
                "'{}' rep range {}-{} is inverted",
                row.exercise, row.min_rep_range, row.max_rep_range
            )));
        }
        if !(0.0..=10.0).contains(&row.rpe) {
            return Err(Error::Persistence(format!(
                "'{}' RPE {} outside 0-10",
                row.exercise, row.rpe
            )));
        }

        self.document.workout_plan.push(row);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        // Temp file in the same directory so the rename stays atomic
        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, &self.document)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Committed plan store to {:?}", self.path);
        Ok(())
    }
}
