//! Plan assembly.
//!
//! Walks the blueprint for the configured day count, fills each slot through
//! the [`Selector`], prescribes load and balances every routine. Missing
//! catalog data and unfillable slots never abort a run; they are reported as
//! [`GenerationWarning`]s next to whatever plan could be built.

use crate::balancer::balance;
use crate::blueprint::get_blueprint;
use crate::catalog::CatalogProvider;
use crate::config::GeneratorConfig;
use crate::persist::persist;
use crate::prescription::PrescriptionCalculator;
use crate::selector::Selector;
use crate::store::PlanStore;
use crate::types::{ExerciseRow, GeneratedPlan, GenerationWarning};
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// A generated plan plus everything that went wrong building it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationOutcome {
    pub plan: GeneratedPlan,
    pub warnings: Vec<GenerationWarning>,
}

/// Builds plans for one validated configuration
pub struct PlanGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> PlanGenerator<'a> {
    /// Validates the configuration up front
    pub fn new(config: &'a GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn generate(&self, catalog: &dyn CatalogProvider) -> GenerationOutcome {
        let config = self.config;
        let mut warnings = Vec::new();

        let snapshot = match catalog.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Catalog unavailable, generating without exercises: {}", e);
                warnings.push(GenerationWarning::CatalogUnavailable {
                    reason: e.to_string(),
                });
                Vec::new()
            }
        };

        let mut selector = Selector::new(&snapshot, config);
        let calculator = PrescriptionCalculator::new(config);
        let keep_history = config.keeps_selection_history();
        let mut plan = GeneratedPlan::default();

        for (routine, slots) in get_blueprint(config.training_days) {
            if !keep_history {
                selector.reset_used();
            }

            let mut rows: Vec<ExerciseRow> = Vec::with_capacity(slots.len());
            for (slot_index, slot) in slots.iter().enumerate() {
                let Some(exercise) = selector.select(slot, routine) else {
                    warnings.push(GenerationWarning::UnfillableSlot {
                        routine: routine.to_string(),
                        slot_index,
                        pattern: slot.pattern,
                        role: slot.role,
                        alternatives: slot.alternative_patterns.to_vec(),
                    });
                    continue;
                };

                let dose = calculator.calculate(slot, exercise);
                rows.push(ExerciseRow {
                    routine: routine.to_string(),
                    exercise: exercise.name.clone(),
                    sets: dose.sets,
                    min_rep_range: dose.min_rep_range,
                    max_rep_range: dose.max_rep_range,
                    rir: dose.rir,
                    rpe: dose.rpe,
                    weight: dose.weight,
                    exercise_order: rows.len() as u32 + 1,
                    pattern: slot.pattern,
                    role: slot.role,
                });
            }

            let report = balance(&mut rows);
            if !rows.is_empty() && !report.in_band {
                warnings.push(GenerationWarning::UnbalancedRoutine {
                    routine: routine.to_string(),
                    total_sets: report.total_sets,
                });
            }

            tracing::info!(
                "Routine {}: {} exercises, {} sets",
                routine,
                rows.len(),
                report.total_sets
            );
            plan.routines.push((routine.to_string(), rows));
        }

        GenerationOutcome { plan, warnings }
    }
}

/// What happened when the plan was written out
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistenceOutcome {
    Skipped,
    Inserted {
        counts: BTreeMap<String, usize>,
        renamed: BTreeMap<String, String>,
    },
    Failed {
        error: String,
    },
}

/// Summary handed back to callers of [`generate_starter_plan`]
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StarterPlanReport {
    /// Routine name → exercise names in training order
    pub routines: Vec<(String, Vec<String>)>,
    pub total_exercises: usize,
    pub sets_per_routine: BTreeMap<String, u32>,
    pub warnings: Vec<GenerationWarning>,
    pub persistence: PersistenceOutcome,
    #[serde(skip)]
    pub plan: GeneratedPlan,
}

impl StarterPlanReport {
    fn new(
        plan: GeneratedPlan,
        warnings: Vec<GenerationWarning>,
        persistence: PersistenceOutcome,
    ) -> Self {
        let routines = plan
            .routines
            .iter()
            .map(|(name, rows)| {
                (
                    name.clone(),
                    rows.iter().map(|r| r.exercise.clone()).collect(),
                )
            })
            .collect();

        Self {
            routines,
            total_exercises: plan.total_exercises(),
            sets_per_routine: plan.sets_per_routine(),
            warnings,
            persistence,
            plan,
        }
    }
}

/// Generate a plan and persist it through the store returned by `open_store`.
///
/// Only configuration errors are returned as `Err`. Catalog and storage
/// failures are folded into the report. The store is not opened when
/// persistence is disabled.
pub fn generate_starter_plan<S, F>(
    config: &GeneratorConfig,
    catalog: &dyn CatalogProvider,
    open_store: F,
) -> Result<StarterPlanReport>
where
    S: PlanStore,
    F: FnOnce() -> Result<S>,
{
    let GenerationOutcome { mut plan, warnings } = PlanGenerator::new(config)?.generate(catalog);

    let persistence = if !config.persist {
        PersistenceOutcome::Skipped
    } else {
        let written = open_store().and_then(|mut store| persist(&mut plan, config, &mut store));
        match written {
            Ok(report) => PersistenceOutcome::Inserted {
                counts: report.inserted,
                renamed: report.renamed,
            },
            Err(e) => {
                tracing::error!("Failed to persist plan: {}", e);
                PersistenceOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    };

    Ok(StarterPlanReport::new(plan, warnings, persistence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balancer::{MAX_ROUTINE_SETS, MIN_ROUTINE_SETS};
    use crate::catalog::{default_exercises, BuiltinCatalog};
    use crate::selector::HOME_EQUIPMENT;
    use crate::store::JsonPlanStore;
    use crate::types::{
        normalize_token, Environment, ExerciseRecord, ExperienceLevel, Goal, MovementPattern,
    };
    use crate::Error;

    fn config(days: u8, environment: Environment, experience: ExperienceLevel) -> GeneratorConfig {
        GeneratorConfig::new(days, environment, experience, Goal::Hypertrophy, 1.0)
            .unwrap()
            .with_seed(7)
            .with_persist(false)
    }

    fn generate(config: &GeneratorConfig) -> GenerationOutcome {
        PlanGenerator::new(config).unwrap().generate(&BuiltinCatalog)
    }

    fn find(name: &str) -> &'static ExerciseRecord {
        default_exercises()
            .iter()
            .find(|r| r.name == name)
            .unwrap()
    }

    struct BrokenCatalog;

    impl CatalogProvider for BrokenCatalog {
        fn load(&self) -> Result<Vec<ExerciseRecord>> {
            Err(Error::Catalog("exercise table missing".into()))
        }
    }

    #[test]
    fn test_routine_names_follow_day_count() {
        let expected: [&[&str]; 5] = [
            &["A"],
            &["A", "B"],
            &["A", "B", "C"],
            &["A", "B", "C", "D"],
            &["A", "B", "C", "D", "E"],
        ];
        for (days, names) in (1..=5).zip(expected) {
            let outcome = generate(&config(days, Environment::Gym, ExperienceLevel::Intermediate));
            assert_eq!(outcome.plan.routine_names(), names.to_vec());
        }
    }

    #[test]
    fn test_rows_match_the_slots_they_fill() {
        for environment in [Environment::Gym, Environment::Home] {
            for days in 1..=5 {
                let config = config(days, environment, ExperienceLevel::Novice);
                let outcome = generate(&config);

                let routines = outcome.plan.routines.iter().zip(get_blueprint(days));
                for ((name, rows), (routine, slots)) in routines {
                    assert_eq!(name, routine);

                    let unfilled: Vec<usize> = outcome
                        .warnings
                        .iter()
                        .filter_map(|w| match w {
                            GenerationWarning::UnfillableSlot {
                                routine: r,
                                slot_index,
                                ..
                            } if r == name => Some(*slot_index),
                            _ => None,
                        })
                        .collect();
                    let filled: Vec<_> = slots
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| !unfilled.contains(i))
                        .map(|(_, slot)| slot)
                        .collect();
                    assert_eq!(rows.len(), filled.len());

                    for (i, (row, slot)) in rows.iter().zip(filled).enumerate() {
                        assert_eq!(row.pattern, slot.pattern);
                        assert_eq!(row.role, slot.role);
                        assert_eq!(row.exercise_order, i as u32 + 1);
                        assert!(row.sets >= 1);
                        assert_eq!(row.weight, 0.0);
                    }
                }
            }
        }
    }

    /// Two squats and two hinges, with stable score gaps between them
    fn history_catalog() -> Vec<ExerciseRecord> {
        let record = |name: &str, equipment: &str, utility: Option<&str>| ExerciseRecord {
            equipment: Some(equipment.into()),
            difficulty: Some("Beginner".into()),
            utility: utility.map(String::from),
            ..ExerciseRecord::named(name)
        };
        vec![
            record("Dumbbell Split Squat", "Dumbbells", None),
            record("Walking Lunge", "Bodyweight", None),
            record("Barbell Hip Thrust", "Barbell", Some("Basic")),
            record("Good Morning", "Barbell", None),
        ]
    }

    fn picks(outcome: &GenerationOutcome, routine: &str) -> Vec<String> {
        outcome
            .plan
            .routine(routine)
            .unwrap()
            .iter()
            .map(|r| r.exercise.clone())
            .collect()
    }

    #[test]
    fn test_consistent_novice_keeps_history_across_routines() {
        let catalog = history_catalog();
        let config = config(2, Environment::Gym, ExperienceLevel::Novice);
        assert!(config.keeps_selection_history());
        let outcome = PlanGenerator::new(&config).unwrap().generate(&catalog);

        assert_eq!(picks(&outcome, "A"), vec!["Dumbbell Split Squat", "Barbell Hip Thrust"]);
        // Main hinge in B repeats A's pick; the accessory squat avoids it
        assert_eq!(picks(&outcome, "B"), vec!["Barbell Hip Thrust", "Walking Lunge"]);
    }

    #[test]
    fn test_history_resets_per_routine_otherwise() {
        let catalog = history_catalog();
        let configs = [
            config(2, Environment::Gym, ExperienceLevel::Intermediate),
            config(2, Environment::Gym, ExperienceLevel::Novice).with_consistency_mode(false),
        ];

        for config in &configs {
            assert!(!config.keeps_selection_history());
            let outcome = PlanGenerator::new(config).unwrap().generate(&catalog);

            assert_eq!(picks(&outcome, "A"), vec!["Dumbbell Split Squat", "Barbell Hip Thrust"]);
            // Routine B starts fresh, so the best scorers win again
            assert_eq!(picks(&outcome, "B"), vec!["Barbell Hip Thrust", "Dumbbell Split Squat"]);
        }
    }

    #[test]
    fn test_empty_target_list_from_config_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[generator]\ntraining_days = 2\nseed = 1\ntarget_muscle_groups = []\n",
        )
        .unwrap();

        let loaded = crate::config::Config::load_from(&path).unwrap();
        assert_eq!(loaded.generator.target_muscle_groups, Some(Vec::new()));

        let targeted = PlanGenerator::new(&loaded.generator).unwrap().generate(&BuiltinCatalog);
        let mut untargeted_config = loaded.generator.clone();
        untargeted_config.target_muscle_groups = None;
        let untargeted = PlanGenerator::new(&untargeted_config)
            .unwrap()
            .generate(&BuiltinCatalog);

        assert!(targeted.plan.total_exercises() > 0);
        assert_eq!(targeted, untargeted);
    }

    #[test]
    fn test_home_plan_uses_home_equipment_only() {
        let outcome = generate(&config(3, Environment::Home, ExperienceLevel::Intermediate));
        let home: Vec<String> = HOME_EQUIPMENT.iter().map(|e| normalize_token(e)).collect();

        assert!(outcome.plan.total_exercises() > 0);
        for (_, rows) in &outcome.plan.routines {
            for row in rows {
                let equipment = find(&row.exercise).equipment.as_deref().unwrap();
                assert!(home.contains(&normalize_token(equipment)), "{}", row.exercise);
            }
        }
    }

    #[test]
    fn test_excluded_exercises_never_appear() {
        let excluded = ["Barbell Back Squat", "push-up", "LAT PULLDOWN"];
        let config = config(5, Environment::Gym, ExperienceLevel::Intermediate).excluding(excluded);
        let outcome = generate(&config);

        for (_, rows) in &outcome.plan.routines {
            for row in rows {
                assert!(!excluded.iter().any(|e| e.eq_ignore_ascii_case(&row.exercise)));
            }
        }
    }

    #[test]
    fn test_two_day_novice_gym_is_balanced() {
        let outcome = generate(&config(2, Environment::Gym, ExperienceLevel::Novice));

        for (name, total) in outcome.plan.sets_per_routine() {
            assert!(
                (MIN_ROUTINE_SETS..=MAX_ROUTINE_SETS).contains(&total),
                "routine {} has {} sets",
                name,
                total
            );
        }
        assert!(!outcome
            .warnings
            .iter()
            .any(|w| matches!(w, GenerationWarning::UnbalancedRoutine { .. })));
    }

    #[test]
    fn test_no_overhead_press_restriction() {
        let config = config(5, Environment::Gym, ExperienceLevel::Intermediate)
            .restricting("no_overhead_press");
        let outcome = generate(&config);

        for (_, rows) in &outcome.plan.routines {
            for row in rows {
                let name = row.exercise.to_lowercase();
                assert!(!name.contains("overhead"), "{}", row.exercise);
                assert!(!name.contains("shoulder press"), "{}", row.exercise);
                assert!(!name.contains("military"), "{}", row.exercise);
            }
        }
    }

    #[test]
    fn test_novice_skips_advanced_exercises() {
        for days in 1..=5 {
            let outcome = generate(&config(days, Environment::Home, ExperienceLevel::Novice));
            for (_, rows) in &outcome.plan.routines {
                for row in rows {
                    let difficulty = find(&row.exercise).difficulty.as_deref();
                    assert_ne!(difficulty, Some("Advanced"), "{}", row.exercise);
                }
            }
        }
    }

    #[test]
    fn test_no_repeats_within_routine_without_consistency() {
        let config = config(4, Environment::Gym, ExperienceLevel::Intermediate);
        let outcome = generate(&config);
        for (_, rows) in &outcome.plan.routines {
            let mut names: Vec<&str> = rows.iter().map(|r| r.exercise.as_str()).collect();
            names.sort();
            let before = names.len();
            names.dedup();
            assert_eq!(names.len(), before);
        }
    }

    #[test]
    fn test_seed_makes_generation_reproducible() {
        let config = config(3, Environment::Gym, ExperienceLevel::Intermediate);
        assert_eq!(generate(&config), generate(&config));
    }

    #[test]
    fn test_empty_catalog_reports_every_slot() {
        let config = config(2, Environment::Gym, ExperienceLevel::Novice);
        let outcome = PlanGenerator::new(&config)
            .unwrap()
            .generate(&Vec::<ExerciseRecord>::new());

        let slots: usize = get_blueprint(2).iter().map(|(_, s)| s.len()).sum();
        assert_eq!(outcome.plan.total_exercises(), 0);
        assert_eq!(outcome.plan.routine_names(), vec!["A", "B"]);
        assert_eq!(outcome.warnings.len(), slots);
        assert!(outcome
            .warnings
            .iter()
            .all(|w| matches!(w, GenerationWarning::UnfillableSlot { .. })));
    }

    #[test]
    fn test_unfillable_slot_carries_alternatives() {
        // Only squats in the catalog: every other slot goes unfilled
        let catalog = vec![ExerciseRecord {
            equipment: Some("Barbell".into()),
            ..ExerciseRecord::named("Barbell Back Squat")
        }];
        let config = config(1, Environment::Gym, ExperienceLevel::Intermediate);
        let outcome = PlanGenerator::new(&config).unwrap().generate(&catalog);

        let rows = outcome.plan.routine("A").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pattern, MovementPattern::Squat);
        // Lone main row raised to the cap, still short of the band
        assert_eq!(rows[0].sets, 5);

        assert!(outcome.warnings.contains(&GenerationWarning::UnfillableSlot {
            routine: "A".into(),
            slot_index: 1,
            pattern: MovementPattern::HorizontalPush,
            role: crate::types::Role::Main,
            alternatives: vec![MovementPattern::VerticalPush],
        }));
        assert!(outcome.warnings.contains(&GenerationWarning::UnbalancedRoutine {
            routine: "A".into(),
            total_sets: 5,
        }));
    }

    #[test]
    fn test_catalog_failure_degrades_gracefully() {
        crate::logging::init_test();
        let config = config(3, Environment::Gym, ExperienceLevel::Novice);
        let outcome = PlanGenerator::new(&config).unwrap().generate(&BrokenCatalog);

        assert_eq!(outcome.plan.total_exercises(), 0);
        assert!(matches!(
            outcome.warnings.first(),
            Some(GenerationWarning::CatalogUnavailable { .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = GeneratorConfig::default();
        config.training_days = 9;
        assert!(matches!(PlanGenerator::new(&config), Err(Error::Config(_))));

        let result = generate_starter_plan(&config, &BuiltinCatalog, || -> Result<JsonPlanStore> {
            panic!("store must not be opened for an invalid config")
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_starter_plan_skips_store_when_not_persisting() {
        let config = config(2, Environment::Gym, ExperienceLevel::Novice);
        let report = generate_starter_plan(&config, &BuiltinCatalog, || -> Result<JsonPlanStore> {
            panic!("store must not be opened")
        })
        .unwrap();

        assert_eq!(report.persistence, PersistenceOutcome::Skipped);
        assert_eq!(report.routines.len(), 2);
        assert_eq!(report.total_exercises, report.plan.total_exercises());
        assert_eq!(report.sets_per_routine, report.plan.sets_per_routine());
    }

    #[test]
    fn test_repeated_overwrite_runs_stay_bounded() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plan.json");
        let config = config(3, Environment::Gym, ExperienceLevel::Novice).with_persist(true);

        let open = || JsonPlanStore::open(&path);
        let first = generate_starter_plan(&config, &BuiltinCatalog, open).unwrap();
        let second = generate_starter_plan(&config, &BuiltinCatalog, open).unwrap();
        assert!(matches!(first.persistence, PersistenceOutcome::Inserted { .. }));

        let store = JsonPlanStore::open(&path).unwrap();
        assert_eq!(store.rows().len(), second.total_exercises);
        for (routine, exercises) in &second.routines {
            assert_eq!(store.routine_rows(routine).len(), exercises.len());
        }
    }

    #[test]
    fn test_store_failure_is_reported_not_raised() {
        let config = config(1, Environment::Gym, ExperienceLevel::Novice).with_persist(true);
        let report = generate_starter_plan(&config, &BuiltinCatalog, || -> Result<JsonPlanStore> {
            Err(Error::Persistence("database locked".into()))
        })
        .unwrap();

        assert!(report.total_exercises > 0);
        match report.persistence {
            PersistenceOutcome::Failed { error } => assert!(error.contains("database locked")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
