//! Exercise catalog providers.
//!
//! The generator reads the catalog once per run through [`CatalogProvider`].
//! Two providers ship with the crate: a CSV export of a user-editable catalog
//! and a small built-in catalog covering every movement pattern for both gym
//! and home training.

use crate::classifier::classify;
use crate::types::ExerciseRecord;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Source of exercise records
pub trait CatalogProvider {
    /// Read a point-in-time snapshot of the catalog
    fn load(&self) -> Result<Vec<ExerciseRecord>>;
}

impl CatalogProvider for Vec<ExerciseRecord> {
    fn load(&self) -> Result<Vec<ExerciseRecord>> {
        Ok(self.clone())
    }
}

/// Catalog read from a CSV file with an `exercise_name` header
pub struct CsvCatalog {
    path: PathBuf,
}

impl CsvCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogProvider for CsvCatalog {
    fn load(&self) -> Result<Vec<ExerciseRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| Error::Catalog(format!("{}: {}", self.path.display(), e)))?;

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<ExerciseRecord>().enumerate() {
            match row {
                Ok(record) => records.push(record),
                Err(e) => {
                    // Header is line 1
                    tracing::warn!("Skipping catalog row {}: {}", index + 2, e);
                }
            }
        }

        tracing::debug!(
            "Read {} exercises from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// The catalog compiled into the binary
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinCatalog;

impl CatalogProvider for BuiltinCatalog {
    fn load(&self) -> Result<Vec<ExerciseRecord>> {
        Ok(DEFAULT_EXERCISES.clone())
    }
}

/// Get a reference to the cached built-in exercise list
pub fn default_exercises() -> &'static [ExerciseRecord] {
    &DEFAULT_EXERCISES
}

// name, primary, secondary, mechanic, utility, equipment, difficulty
type Row = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

#[rustfmt::skip]
const BUILTIN: &[Row] = &[
    // Squat
    ("Barbell Back Squat", "Quadriceps", "Glutes", "Compound", "Basic", "Barbell", "Intermediate"),
    ("Goblet Squat", "Quadriceps", "Glutes", "Compound", "Basic", "Dumbbells", "Beginner"),
    ("Bodyweight Squat", "Quadriceps", "Glutes", "Compound", "Basic", "Bodyweight", "Beginner"),
    ("Leg Press", "Quadriceps", "Glutes", "Compound", "Basic", "Machine", "Beginner"),
    ("Dumbbell Bulgarian Split Squat", "Quadriceps", "Glutes", "Compound", "Auxiliary", "Dumbbells", "Intermediate"),
    ("Walking Lunge", "Quadriceps", "Glutes", "Compound", "Auxiliary", "Bodyweight", "Beginner"),
    ("Dumbbell Step-Up", "Quadriceps", "Glutes", "Compound", "Auxiliary", "Dumbbells", "Beginner"),
    ("Pistol Squat", "Quadriceps", "Glutes", "Compound", "Auxiliary", "Bodyweight", "Advanced"),
    // Hinge
    ("Barbell Deadlift", "Hamstrings", "Glutes", "Compound", "Basic", "Barbell", "Intermediate"),
    ("Trap Bar Deadlift", "Glutes", "Quadriceps", "Compound", "Basic", "Trap_Bar", "Beginner"),
    ("Dumbbell Romanian Deadlift", "Hamstrings", "Glutes", "Compound", "Basic", "Dumbbells", "Beginner"),
    ("Barbell Hip Thrust", "Glutes", "Hamstrings", "Compound", "Basic", "Barbell", "Beginner"),
    ("Glute Bridge", "Glutes", "Hamstrings", "Compound", "Auxiliary", "Bodyweight", "Beginner"),
    ("Kettlebell Swing", "Glutes", "Hamstrings", "Compound", "Basic", "Kettlebells", "Intermediate"),
    ("Single Leg Deadlift", "Hamstrings", "Glutes", "Compound", "Auxiliary", "Dumbbells", "Intermediate"),
    // Horizontal push
    ("Barbell Bench Press", "Chest", "Triceps", "Compound", "Basic", "Barbell", "Beginner"),
    ("Dumbbell Bench Press", "Chest", "Triceps", "Compound", "Basic", "Dumbbells", "Beginner"),
    ("Push-Up", "Chest", "Triceps", "Compound", "Basic", "Bodyweight", "Beginner"),
    ("Machine Chest Press", "Chest", "Triceps", "Compound", "Basic", "Machine", "Beginner"),
    ("Parallel Bar Dip", "Chest", "Triceps", "Compound", "Auxiliary", "Bodyweight", "Intermediate"),
    // Vertical push
    ("Barbell Overhead Press", "Shoulders", "Triceps", "Compound", "Basic", "Barbell", "Intermediate"),
    ("Seated Dumbbell Shoulder Press", "Shoulders", "Triceps", "Compound", "Basic", "Dumbbells", "Beginner"),
    ("Pike Push-Up", "Shoulders", "Triceps", "Compound", "Auxiliary", "Bodyweight", "Intermediate"),
    ("Landmine Press", "Shoulders", "Chest", "Compound", "Auxiliary", "Barbell", "Beginner"),
    ("Band Overhead Press", "Shoulders", "Triceps", "Compound", "Auxiliary", "Band", "Beginner"),
    // Horizontal pull
    ("Barbell Bent Over Row", "Middle Back", "Biceps", "Compound", "Basic", "Barbell", "Intermediate"),
    ("One-Arm Dumbbell Row", "Middle Back", "Biceps", "Compound", "Basic", "Dumbbells", "Beginner"),
    ("Seated Cable Row", "Middle Back", "Biceps", "Compound", "Basic", "Cables", "Beginner"),
    ("TRX Row", "Middle Back", "Biceps", "Compound", "Auxiliary", "Trx", "Beginner"),
    ("Cable Face Pull", "Rear Shoulders", "Traps", "Isolated", "Auxiliary", "Cables", "Beginner"),
    ("Band Face Pull", "Rear Shoulders", "Traps", "Isolated", "Auxiliary", "Band", "Beginner"),
    ("Banded Row", "Middle Back", "Biceps", "Compound", "Auxiliary", "Band", "Beginner"),
    // Vertical pull
    ("Pull-Up", "Lats", "Biceps", "Compound", "Basic", "Bodyweight", "Intermediate"),
    ("Chin-Up", "Lats", "Biceps", "Compound", "Basic", "Bodyweight", "Intermediate"),
    ("Lat Pulldown", "Lats", "Biceps", "Compound", "Basic", "Cables", "Beginner"),
    ("Band Assisted Pull-Up", "Lats", "Biceps", "Compound", "Basic", "Band", "Beginner"),
    ("Band Lat Pulldown", "Lats", "Biceps", "Compound", "Auxiliary", "Band", "Beginner"),
    // Core static
    ("Plank", "Abdominals", "", "Isolated", "Auxiliary", "Bodyweight", "Beginner"),
    ("Side Plank", "Obliques", "Abdominals", "Isolated", "Auxiliary", "Bodyweight", "Beginner"),
    ("Cable Pallof Press", "Abdominals", "Obliques", "Isolated", "Auxiliary", "Cables", "Beginner"),
    ("Band Pallof Press", "Abdominals", "Obliques", "Isolated", "Auxiliary", "Band", "Beginner"),
    ("Dead Bug", "Abdominals", "", "Isolated", "Auxiliary", "Bodyweight", "Beginner"),
    // Core dynamic
    ("Hanging Leg Raise", "Abdominals", "Hip Flexors", "Isolated", "Auxiliary", "Bodyweight", "Intermediate"),
    ("Lying Leg Raise", "Abdominals", "Hip Flexors", "Isolated", "Auxiliary", "Bodyweight", "Beginner"),
    ("Cable Crunch", "Abdominals", "", "Isolated", "Auxiliary", "Cables", "Beginner"),
    ("Russian Twist", "Obliques", "Abdominals", "Isolated", "Auxiliary", "Medicine_Ball", "Beginner"),
    ("Ab Wheel Rollout", "Abdominals", "Lats", "Isolated", "Auxiliary", "Bodyweight", "Advanced"),
    // Upper isolation
    ("Dumbbell Biceps Curl", "Biceps", "Forearms", "Isolated", "Auxiliary", "Dumbbells", "Beginner"),
    ("EZ Bar Curl", "Biceps", "Forearms", "Isolated", "Auxiliary", "Ez_Bar", "Beginner"),
    ("Band Biceps Curl", "Biceps", "Forearms", "Isolated", "Auxiliary", "Band", "Beginner"),
    ("Cable Triceps Pushdown", "Triceps", "", "Isolated", "Auxiliary", "Cables", "Beginner"),
    ("Band Triceps Pushdown", "Triceps", "", "Isolated", "Auxiliary", "Band", "Beginner"),
    ("Lying Dumbbell Triceps Extension", "Triceps", "", "Isolated", "Auxiliary", "Dumbbells", "Beginner"),
    ("Dumbbell Lateral Raise", "Shoulders", "", "Isolated", "Auxiliary", "Dumbbells", "Beginner"),
    ("Band Lateral Raise", "Shoulders", "", "Isolated", "Auxiliary", "Band", "Beginner"),
    ("Dumbbell Chest Fly", "Chest", "Shoulders", "Isolated", "Auxiliary", "Dumbbells", "Beginner"),
    ("Cable Crossover", "Chest", "Shoulders", "Isolated", "Auxiliary", "Cables", "Beginner"),
    ("Dumbbell Rear Delt Fly", "Rear Shoulders", "Traps", "Isolated", "Auxiliary", "Dumbbells", "Beginner"),
    ("Dumbbell Shrug", "Traps", "", "Isolated", "Auxiliary", "Dumbbells", "Beginner"),
    // Lower isolation
    ("Leg Extension", "Quadriceps", "", "Isolated", "Auxiliary", "Machine", "Beginner"),
    ("Lying Leg Curl", "Hamstrings", "", "Isolated", "Auxiliary", "Machine", "Beginner"),
    ("Nordic Curl", "Hamstrings", "Glutes", "Isolated", "Auxiliary", "Bodyweight", "Advanced"),
    ("Standing Calf Raise", "Calves", "", "Isolated", "Auxiliary", "Machine", "Beginner"),
    ("Single Leg Calf Raise", "Calves", "", "Isolated", "Auxiliary", "Bodyweight", "Beginner"),
    ("Hip Abduction Machine", "Abductors", "Glutes", "Isolated", "Auxiliary", "Machine", "Beginner"),
    ("Band Clamshell", "Abductors", "Glutes", "Isolated", "Auxiliary", "Band", "Beginner"),
    ("Cable Glute Kickback", "Glutes", "Hamstrings", "Isolated", "Auxiliary", "Cables", "Beginner"),
    ("Band Glute Kickback", "Glutes", "Hamstrings", "Isolated", "Auxiliary", "Band", "Beginner"),
];

/// Cached built-in catalog
static DEFAULT_EXERCISES: Lazy<Vec<ExerciseRecord>> = Lazy::new(|| {
    BUILTIN
        .iter()
        .map(
            |&(name, primary, secondary, mechanic, utility, equipment, difficulty)| ExerciseRecord {
                name: name.to_string(),
                primary_muscle_group: non_empty(primary),
                secondary_muscle_group: non_empty(secondary),
                mechanic: non_empty(mechanic),
                utility: non_empty(utility),
                equipment: non_empty(equipment),
                difficulty: non_empty(difficulty),
                movement_pattern: None,
                movement_subpattern: None,
            },
        )
        .collect()
});

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Check a catalog for records the generator cannot use.
///
/// Returns a list of human-readable problems, or an empty Vec if clean.
pub fn validate_catalog(records: &[ExerciseRecord]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for record in records {
        let name = record.name.trim();
        if name.is_empty() {
            errors.push("Exercise has empty name".to_string());
            continue;
        }

        if !seen.insert(name.to_lowercase()) {
            errors.push(format!("Duplicate exercise name '{}'", name));
        }

        if let Some(raw) = record.movement_pattern.as_deref().filter(|s| !s.trim().is_empty()) {
            if record.stored_pattern().is_none() {
                errors.push(format!("'{}' has unknown movement pattern '{}'", name, raw));
            }
        }

        if let Some(raw) = record
            .movement_subpattern
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            match (record.stored_subpattern(), record.stored_pattern()) {
                (None, _) => {
                    errors.push(format!("'{}' has unknown movement subpattern '{}'", name, raw))
                }
                (Some(sub), Some(pattern)) if sub.pattern() != pattern => errors.push(format!(
                    "'{}' subpattern {} does not belong to pattern {}",
                    name, sub, pattern
                )),
                _ => {}
            }
        }

        let classified = record.stored_pattern().or_else(|| {
            classify(
                name,
                record.primary_muscle_group.as_deref(),
                record.mechanic.as_deref(),
            )
            .0
        });
        if classified.is_none() {
            errors.push(format!(
                "'{}' matches no movement pattern and will never be selected",
                name
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::HOME_EQUIPMENT;
    use crate::types::{normalize_token, MovementPattern};

    fn pattern_of(record: &ExerciseRecord) -> Option<MovementPattern> {
        classify(
            &record.name,
            record.primary_muscle_group.as_deref(),
            record.mechanic.as_deref(),
        )
        .0
    }

    #[test]
    fn test_builtin_catalog_validates() {
        let errors = validate_catalog(default_exercises());
        assert!(errors.is_empty(), "Built-in catalog has errors: {:?}", errors);
    }

    #[test]
    fn test_builtin_catalog_covers_every_pattern_at_home() {
        let home: Vec<String> = HOME_EQUIPMENT.iter().map(|e| normalize_token(e)).collect();
        for pattern in MovementPattern::ALL {
            let count = default_exercises()
                .iter()
                .filter(|r| pattern_of(r) == Some(pattern))
                .filter(|r| {
                    r.equipment
                        .as_deref()
                        .map(|e| home.contains(&normalize_token(e)))
                        .unwrap_or(false)
                })
                .count();
            assert!(count >= 1, "No home exercise for {}", pattern);
        }
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut bad_pattern = ExerciseRecord::named("Goblet Squat");
        bad_pattern.movement_pattern = Some("SIDEWAYS".into());
        let mut mismatched = ExerciseRecord::named("Hip Thrust");
        mismatched.movement_pattern = Some("SQUAT".into());
        mismatched.movement_subpattern = Some("HIP_THRUST".into());

        let records = vec![
            ExerciseRecord::named(""),
            ExerciseRecord::named("Plank"),
            ExerciseRecord::named("plank"),
            ExerciseRecord::named("Zumba"),
            bad_pattern,
            mismatched,
        ];

        let errors = validate_catalog(&records);
        assert_eq!(errors.len(), 5, "{:?}", errors);
        assert!(errors.iter().any(|e| e.contains("empty name")));
        assert!(errors.iter().any(|e| e.contains("Duplicate")));
        assert!(errors.iter().any(|e| e.contains("Zumba")));
        assert!(errors.iter().any(|e| e.contains("SIDEWAYS")));
        assert!(errors.iter().any(|e| e.contains("does not belong")));
    }

    #[test]
    fn test_csv_catalog_reads_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("exercises.csv");
        std::fs::write(
            &path,
            "exercise_name,primary_muscle_group,secondary_muscle_group,mechanic,utility,\
             equipment,difficulty,movement_pattern,movement_subpattern\n\
             Goblet Squat,Quadriceps,Glutes,Compound,Basic,Dumbbells,Beginner,\
             SQUAT,BILATERAL_SQUAT\n\
             Plank,Abdominals,,Isolated,Auxiliary,Bodyweight,Beginner,,\n",
        )
        .unwrap();

        let records = CsvCatalog::new(&path).load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Goblet Squat");
        assert_eq!(records[0].stored_pattern(), Some(MovementPattern::Squat));
        assert_eq!(records[1].secondary_muscle_group, None);
        assert_eq!(records[1].movement_pattern, None);
    }

    #[test]
    fn test_csv_catalog_tolerates_missing_columns() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("minimal.csv");
        std::fs::write(&path, "exercise_name,equipment\nPush-Up,Bodyweight\n").unwrap();

        let records = CsvCatalog::new(&path).load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].equipment.as_deref(), Some("Bodyweight"));
        assert_eq!(records[0].difficulty, None);
    }

    #[test]
    fn test_missing_csv_is_catalog_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = CsvCatalog::new(temp_dir.path().join("absent.csv")).load();
        assert!(matches!(result, Err(Error::Catalog(_))));
    }
}
