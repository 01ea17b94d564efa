//! Writing generated plans to a [`PlanStore`].
//!
//! Overwrite mode replaces stored routines of the same name (and their log
//! entries). Otherwise colliding routines are renamed with a `_genN` suffix
//! so nothing stored is touched. Row inserts are best effort; failures while
//! deleting propagate.

use crate::config::GeneratorConfig;
use crate::store::{PlanStore, StoredRow};
use crate::types::GeneratedPlan;
use crate::Result;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// What a persist call changed
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct PersistReport {
    /// Routine name (after renaming) → rows inserted
    pub inserted: BTreeMap<String, usize>,
    /// Original routine name → new name, for collisions in non-overwrite mode
    pub renamed: BTreeMap<String, String>,
    /// Plan rows removed in overwrite mode
    pub deleted: usize,
}

impl PersistReport {
    pub fn total_inserted(&self) -> usize {
        self.inserted.values().sum()
    }
}

/// Persist a plan, renaming routines in `plan` when needed.
///
/// No-op when `config.persist` is false.
pub fn persist<S>(
    plan: &mut GeneratedPlan,
    config: &GeneratorConfig,
    store: &mut S,
) -> Result<PersistReport>
where
    S: PlanStore + ?Sized,
{
    let mut report = PersistReport::default();
    if !config.persist {
        tracing::debug!("Persistence disabled, plan not stored");
        return Ok(report);
    }

    let names: Vec<String> = plan.routine_names().into_iter().map(String::from).collect();

    if config.overwrite {
        report.deleted = store.delete_routines(&names)?;
    } else {
        let existing = store.routine_names()?;
        for (from, to) in collision_renames(&names, &existing) {
            tracing::info!("Routine {} already stored, saving as {}", from, to);
            plan.rename_routine(&from, &to);
            report.renamed.insert(from, to);
        }
    }

    let mut next_order = store.max_exercise_order()? + 1;
    for (routine, rows) in &plan.routines {
        let mut inserted = 0;
        for row in rows {
            let mut stored = StoredRow::from(row);
            stored.exercise_order = next_order;
            match store.insert_row(stored) {
                Ok(()) => {
                    inserted += 1;
                    next_order += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to insert {} into routine {}: {}",
                        row.exercise,
                        routine,
                        e
                    );
                }
            }
        }
        report.inserted.insert(routine.clone(), inserted);
    }

    store.commit()?;
    tracing::info!(
        "Stored {} rows across {} routines",
        report.total_inserted(),
        report.inserted.len()
    );
    Ok(report)
}

/// Pick a `_genN` name for every routine that collides with stored data
fn collision_renames(names: &[String], existing: &BTreeSet<String>) -> Vec<(String, String)> {
    let mut taken: BTreeSet<String> = existing.iter().cloned().collect();
    taken.extend(names.iter().cloned());

    let mut renames = Vec::new();
    for name in names.iter().filter(|n| existing.contains(*n)) {
        let mut n = 1;
        let candidate = loop {
            let candidate = format!("{}_gen{}", name, n);
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        taken.insert(candidate.clone());
        renames.push((name.clone(), candidate));
    }
    renames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonPlanStore;
    use crate::types::{ExerciseRow, MovementPattern, Role};
    use crate::Error;

    fn row(routine: &str, exercise: &str, order: u32) -> ExerciseRow {
        ExerciseRow {
            routine: routine.into(),
            exercise: exercise.into(),
            sets: 3,
            min_rep_range: 6,
            max_rep_range: 10,
            rir: 2,
            rpe: 8.0,
            weight: 0.0,
            exercise_order: order,
            pattern: MovementPattern::Squat,
            role: Role::Main,
        }
    }

    fn plan() -> GeneratedPlan {
        GeneratedPlan {
            routines: vec![
                ("A".into(), vec![row("A", "Goblet Squat", 1), row("A", "Push-Up", 2)]),
                ("B".into(), vec![row("B", "Pull-Up", 1)]),
            ],
        }
    }

    fn config(overwrite: bool) -> GeneratorConfig {
        GeneratorConfig::default().with_overwrite(overwrite)
    }

    #[test]
    fn test_persist_disabled_is_noop() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plan.json");
        let mut store = JsonPlanStore::open(&path).unwrap();

        let report = persist(&mut plan(), &config(true).with_persist(false), &mut store).unwrap();
        assert_eq!(report, PersistReport::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_overwrite_replaces_routines_and_continues_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plan.json");
        let mut store = JsonPlanStore::open(&path).unwrap();
        store
            .insert_row(StoredRow::from(&row("Legacy", "Old Squat", 7)))
            .unwrap();

        let report = persist(&mut plan(), &config(true), &mut store).unwrap();
        assert_eq!(report.inserted["A"], 2);
        assert_eq!(report.inserted["B"], 1);
        let orders: Vec<u32> = store.routine_rows("A").iter().map(|r| r.exercise_order).collect();
        assert_eq!(orders, vec![8, 9]);

        // Second run replaces rather than accumulates
        let report = persist(&mut plan(), &config(true), &mut store).unwrap();
        assert_eq!(report.deleted, 3);
        assert_eq!(store.rows().len(), 4);
        assert_eq!(store.routine_rows("A").len(), 2);

        let reopened = JsonPlanStore::open(&path).unwrap();
        assert_eq!(reopened.rows().len(), 4);
    }

    #[test]
    fn test_no_overwrite_renames_collisions() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonPlanStore::open(temp_dir.path().join("plan.json")).unwrap();
        persist(&mut plan(), &config(true), &mut store).unwrap();

        let mut second = plan();
        let report = persist(&mut second, &config(false), &mut store).unwrap();
        assert_eq!(report.renamed["A"], "A_gen1");
        assert_eq!(report.renamed["B"], "B_gen1");
        assert_eq!(second.routine_names(), vec!["A_gen1", "B_gen1"]);
        assert_eq!(second.routine("A_gen1").unwrap()[0].routine, "A_gen1");

        let mut third = plan();
        let report = persist(&mut third, &config(false), &mut store).unwrap();
        assert_eq!(report.renamed["A"], "A_gen2");
        assert_eq!(store.rows().len(), 9);
    }

    #[test]
    fn test_collision_renames_skip_taken_suffixes() {
        let existing: BTreeSet<String> =
            ["A", "A_gen1", "C"].iter().map(|s| s.to_string()).collect();
        let names = vec!["A".to_string(), "B".to_string()];
        assert_eq!(
            collision_renames(&names, &existing),
            vec![("A".to_string(), "A_gen2".to_string())]
        );
    }

    /// Store that rejects one exercise and can fail deletes
    #[derive(Default)]
    struct FlakyStore {
        rows: Vec<StoredRow>,
        fail_delete: bool,
        committed: bool,
    }

    impl PlanStore for FlakyStore {
        fn routine_names(&self) -> Result<BTreeSet<String>> {
            Ok(self.rows.iter().map(|r| r.routine.clone()).collect())
        }

        fn max_exercise_order(&self) -> Result<u32> {
            Ok(self.rows.iter().map(|r| r.exercise_order).max().unwrap_or(0))
        }

        fn delete_routines(&mut self, _routines: &[String]) -> Result<usize> {
            if self.fail_delete {
                return Err(Error::Persistence("delete failed".into()));
            }
            Ok(0)
        }

        fn insert_row(&mut self, row: StoredRow) -> Result<()> {
            if row.exercise == "Push-Up" {
                return Err(Error::Persistence("constraint violation".into()));
            }
            self.rows.push(row);
            Ok(())
        }

        fn commit(&mut self) -> Result<()> {
            self.committed = true;
            Ok(())
        }
    }

    #[test]
    fn test_failed_insert_is_skipped() {
        crate::logging::init_test();
        let mut store = FlakyStore::default();
        let report = persist(&mut plan(), &config(true), &mut store).unwrap();
        assert_eq!(report.inserted["A"], 1);
        assert_eq!(report.inserted["B"], 1);
        assert!(store.committed);
        let orders: Vec<u32> = store.rows.iter().map(|r| r.exercise_order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[test]
    fn test_delete_failure_propagates() {
        let mut store = FlakyStore {
            fail_delete: true,
            ..FlakyStore::default()
        };
        let result = persist(&mut plan(), &config(true), &mut store);
        assert!(matches!(result, Err(Error::Persistence(_))));
        assert!(store.rows.is_empty());
        assert!(!store.committed);
    }
}
