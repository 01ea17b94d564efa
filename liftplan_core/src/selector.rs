//! Constrained, scored exercise selection.
//!
//! A [`Selector`] is created per generation run. It owns the set of
//! exercises already used in the run and the jitter RNG, so repeated or
//! concurrent runs never share selection state.

use crate::blueprint::SlotDefinition;
use crate::classifier::{classify, is_isolation_mechanic, subpattern_keywords};
use crate::config::GeneratorConfig;
use crate::types::{
    normalize_token, Environment, ExerciseRecord, ExperienceLevel, MovementPattern, Role,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

/// Equipment usable in a home setting
pub const HOME_EQUIPMENT: &[&str] = &[
    "Bodyweight",
    "Dumbbells",
    "Band",
    "Kettlebells",
    "Trx",
    "Medicine_Ball",
    "Bosu_Ball",
];

/// Equipment usable in a commercial gym
pub const GYM_EQUIPMENT: &[&str] = &[
    "Barbell",
    "Dumbbells",
    "Cables",
    "Machine",
    "Smith_Machine",
    "Ez_Bar",
    "Trap_Bar",
    "Plate",
    "Bodyweight",
    "Band",
    "Kettlebells",
    "Trx",
    "Medicine_Ball",
    "Bosu_Ball",
    "Stability_Ball",
];

/// Restriction key → lowercase name fragments it bans
const RESTRICTIONS: &[(&str, &[&str])] = &[
    ("no_overhead_press", &["overhead", "military", "shoulder press"]),
    ("no_deadlift", &["deadlift"]),
    ("no_squat", &["squat"]),
    ("no_jump", &["jump", "plyo", "burpee"]),
];

/// Banned name fragments for a restriction key, `None` if the key is unknown
pub fn restriction_terms(key: &str) -> Option<&'static [&'static str]> {
    let key = normalize_token(key);
    RESTRICTIONS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, terms)| *terms)
}

/// Numeric difficulty: beginner=1, intermediate=2, advanced=3.
///
/// Missing or unrecognised difficulty ranks as intermediate.
pub fn difficulty_rank(difficulty: Option<&str>) -> u8 {
    match difficulty.map(|d| d.trim().to_lowercase()).as_deref() {
        Some("beginner") => 1,
        Some("advanced") => 3,
        _ => 2,
    }
}

/// Highest difficulty rank a novice may be given
const NOVICE_MAX_DIFFICULTY: u8 = 2;

// Score weights
const BASE_SCORE: f64 = 100.0;
const STORED_SUBPATTERN_BONUS: f64 = 30.0;
const KEYWORD_SUBPATTERN_BONUS: f64 = 20.0;
const MAIN_BASIC_BONUS: f64 = 20.0;
const MAIN_COMPOUND_BONUS: f64 = 15.0;
const ACCESSORY_UTILITY_BONUS: f64 = 10.0;
const ACCESSORY_ISOLATION_BONUS: f64 = 15.0;
const PREFERRED_BONUS: f64 = 50.0;
const CONSISTENT_MAIN_REPEAT: f64 = 5.0;
const CONSISTENT_ACCESSORY_REPEAT: f64 = -30.0;
const REPEAT_PENALTY: f64 = -40.0;
const JITTER_MAX: f64 = 5.0;

/// Per-run exercise selector
pub struct Selector<'a> {
    catalog: &'a [ExerciseRecord],
    config: &'a GeneratorConfig,
    allowed_equipment: HashSet<String>,
    excluded: HashSet<String>,
    banned_terms: Vec<&'static str>,
    preferred: HashMap<MovementPattern, HashSet<String>>,
    targets: Option<Vec<String>>,
    used: HashSet<String>,
    rng: StdRng,
}

impl<'a> Selector<'a> {
    pub fn new(catalog: &'a [ExerciseRecord], config: &'a GeneratorConfig) -> Self {
        let environment_set = match config.environment {
            Environment::Gym => GYM_EQUIPMENT,
            Environment::Home => HOME_EQUIPMENT,
        };
        let mut allowed_equipment: HashSet<String> =
            environment_set.iter().map(|e| normalize_token(e)).collect();
        if let Some(whitelist) = &config.equipment_whitelist {
            let whitelist: HashSet<String> = whitelist.iter().map(|e| normalize_token(e)).collect();
            allowed_equipment.retain(|e| whitelist.contains(e));
        }

        let banned_terms: Vec<&'static str> = config
            .movement_restrictions
            .iter()
            .filter(|(_, enabled)| **enabled)
            .filter_map(|(key, _)| restriction_terms(key))
            .flatten()
            .copied()
            .collect();

        let preferred: HashMap<MovementPattern, HashSet<String>> = config
            .preferred_exercises
            .iter()
            .map(|(pattern, names)| {
                let names = names.iter().map(|n| n.trim().to_lowercase()).collect();
                (*pattern, names)
            })
            .collect();

        // An empty target list means no targeting
        let targets: Option<Vec<String>> = config
            .target_muscle_groups
            .as_ref()
            .map(|groups| {
                groups
                    .iter()
                    .map(|g| g.trim().to_lowercase())
                    .filter(|g| !g.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|targets| !targets.is_empty());

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            catalog,
            config,
            allowed_equipment,
            excluded: config
                .exclude_exercises
                .iter()
                .map(|n| n.trim().to_lowercase())
                .collect(),
            banned_terms,
            preferred,
            targets,
            used: HashSet::new(),
            rng,
        }
    }

    /// Pick the best exercise for a slot, or `None` when nothing qualifies.
    pub fn select(&mut self, slot: &SlotDefinition, routine: &str) -> Option<&'a ExerciseRecord> {
        let catalog = self.catalog;
        let scored: Vec<(&'a ExerciseRecord, f64)> = catalog
            .iter()
            .filter(|record| self.passes_hard_filters(record, slot.pattern))
            .map(|record| (record, self.score(record, slot)))
            .collect();

        if scored.is_empty() {
            tracing::warn!(
                "Routine {}: no candidate for {} {} slot",
                routine,
                slot.role,
                slot.pattern
            );
            return None;
        }

        let mut best: Option<(&'a ExerciseRecord, f64)> = None;
        for (record, score) in scored {
            let score = score + self.rng.random_range(0.0..=JITTER_MAX);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((record, score));
            }
        }

        let (chosen, score) = best?;
        tracing::debug!(
            "Routine {}: {} {} slot → {} (score {:.1})",
            routine,
            slot.role,
            slot.pattern,
            chosen.name,
            score
        );
        self.used.insert(chosen.name.trim().to_lowercase());
        Some(chosen)
    }

    /// Forget exercises picked so far
    pub fn reset_used(&mut self) {
        self.used.clear();
    }

    /// Pattern used for matching: stored metadata first, then the classifier
    fn effective_pattern(record: &ExerciseRecord) -> Option<MovementPattern> {
        record.stored_pattern().or_else(|| {
            classify(
                &record.name,
                record.primary_muscle_group.as_deref(),
                record.mechanic.as_deref(),
            )
            .0
        })
    }

    fn passes_hard_filters(&self, record: &ExerciseRecord, pattern: MovementPattern) -> bool {
        let name = record.name.trim().to_lowercase();
        if name.is_empty() || self.excluded.contains(&name) {
            return false;
        }

        let equipment_ok = record
            .equipment
            .as_deref()
            .map(|e| self.allowed_equipment.contains(&normalize_token(e)))
            .unwrap_or(false);
        if !equipment_ok {
            return false;
        }

        if !self.matches_targets(record) {
            return false;
        }

        if self.config.experience_level == ExperienceLevel::Novice
            && difficulty_rank(record.difficulty.as_deref()) > NOVICE_MAX_DIFFICULTY
        {
            return false;
        }

        if self.banned_terms.iter().any(|term| name.contains(term)) {
            return false;
        }

        Self::effective_pattern(record) == Some(pattern)
    }

    fn matches_targets(&self, record: &ExerciseRecord) -> bool {
        let Some(targets) = &self.targets else {
            return true;
        };

        let muscles: Vec<String> = [&record.primary_muscle_group, &record.secondary_muscle_group]
            .into_iter()
            .flatten()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();

        // Records without muscle metadata cannot be judged
        if muscles.is_empty() {
            return true;
        }

        muscles.iter().any(|muscle| {
            targets
                .iter()
                .any(|target| muscle.contains(target.as_str()) || target.contains(muscle.as_str()))
        })
    }

    /// Deterministic part of the score
    fn score(&self, record: &ExerciseRecord, slot: &SlotDefinition) -> f64 {
        let name = record.name.trim().to_lowercase();
        let mut score = BASE_SCORE;

        if let Some(preferred_sub) = slot.subpattern_preference {
            if record.stored_subpattern() == Some(preferred_sub) {
                score += STORED_SUBPATTERN_BONUS;
            } else if subpattern_keywords(preferred_sub).any(|k| name.contains(k)) {
                score += KEYWORD_SUBPATTERN_BONUS;
            }
        }

        let utility = record.utility.as_deref().map(|u| u.trim().to_lowercase());
        let mechanic = record.mechanic.as_deref().map(|m| m.trim().to_lowercase());
        match slot.role {
            Role::Main => {
                if utility.as_deref() == Some("basic") {
                    score += MAIN_BASIC_BONUS;
                }
                if mechanic.as_deref() == Some("compound") {
                    score += MAIN_COMPOUND_BONUS;
                }
            }
            Role::Accessory => {
                if matches!(utility.as_deref(), Some("auxiliary") | Some("basic")) {
                    score += ACCESSORY_UTILITY_BONUS;
                }
                if slot.pattern.is_isolation() && is_isolation_mechanic(mechanic.as_deref()) {
                    score += ACCESSORY_ISOLATION_BONUS;
                }
            }
        }

        if self
            .preferred
            .get(&slot.pattern)
            .is_some_and(|names| names.contains(&name))
        {
            score += PREFERRED_BONUS;
        }

        if self.used.contains(&name) {
            score += if self.config.keeps_selection_history() {
                match slot.role {
                    Role::Main => CONSISTENT_MAIN_REPEAT,
                    Role::Accessory => CONSISTENT_ACCESSORY_REPEAT,
                }
            } else {
                REPEAT_PENALTY
            };
        }

        score
    }
}
