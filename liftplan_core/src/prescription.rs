//! Load prescription for filled slots.
//!
//! Sets come from experience and role, scaled by `volume_scale`. Rep ranges
//! come from goal and effective role, where core patterns always use their own
//! row. Effort targets follow RPE ≈ 10 − RIR as guidance only. Working weight
//! is never inferred: it is always a 0 placeholder.

use crate::blueprint::SlotDefinition;
use crate::config::GeneratorConfig;
use crate::types::{ExerciseRecord, ExperienceLevel, Goal, Role};

/// Role after core slots are pulled out into their own dosing category
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectiveRole {
    Main,
    Accessory,
    Core,
}

impl EffectiveRole {
    pub fn of(slot: &SlotDefinition) -> Self {
        if slot.pattern.is_core() {
            EffectiveRole::Core
        } else {
            match slot.role {
                Role::Main => EffectiveRole::Main,
                Role::Accessory => EffectiveRole::Accessory,
            }
        }
    }
}

/// Computed dose for one exercise
#[derive(Clone, Debug, PartialEq)]
pub struct Prescription {
    pub sets: u32,
    pub min_rep_range: u32,
    pub max_rep_range: u32,
    pub rir: u32,
    pub rpe: f64,
    pub weight: f64,
}

/// Base sets per (experience, role) before volume scaling
pub fn base_sets(experience: ExperienceLevel, role: Role) -> u32 {
    match (experience, role) {
        (ExperienceLevel::Novice, Role::Main) => 3,
        (ExperienceLevel::Novice, Role::Accessory) => 2,
        (ExperienceLevel::Intermediate, Role::Main) => 4,
        (ExperienceLevel::Intermediate, Role::Accessory) => 3,
        (ExperienceLevel::Advanced, Role::Main) => 5,
        (ExperienceLevel::Advanced, Role::Accessory) => 3,
    }
}

/// Rep range per (goal, effective role)
pub fn rep_range(goal: Goal, role: EffectiveRole) -> (u32, u32) {
    match (goal, role) {
        (Goal::Hypertrophy, EffectiveRole::Main) => (6, 10),
        (Goal::Hypertrophy, EffectiveRole::Accessory) => (10, 15),
        (Goal::Hypertrophy, EffectiveRole::Core) => (12, 20),
        (Goal::Strength, EffectiveRole::Main) => (3, 6),
        (Goal::Strength, EffectiveRole::Accessory) => (6, 10),
        (Goal::Strength, EffectiveRole::Core) => (8, 12),
        (Goal::General, EffectiveRole::Main) => (8, 12),
        (Goal::General, EffectiveRole::Accessory) => (10, 15),
        (Goal::General, EffectiveRole::Core) => (10, 15),
    }
}

/// (RIR, RPE) per effective role
pub fn effort(role: EffectiveRole) -> (u32, f64) {
    match role {
        EffectiveRole::Main | EffectiveRole::Accessory => (2, 8.0),
        EffectiveRole::Core => (3, 7.0),
    }
}

/// Computes prescriptions for one generation run
pub struct PrescriptionCalculator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> PrescriptionCalculator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, slot: &SlotDefinition, exercise: &ExerciseRecord) -> Prescription {
        let base = base_sets(self.config.experience_level, slot.role);
        let sets = (f64::from(base) * self.config.volume_scale).round().max(1.0) as u32;

        let role = EffectiveRole::of(slot);
        let (min_rep_range, max_rep_range) = rep_range(self.config.goal, role);
        let (rir, rpe) = effort(role);

        tracing::trace!(
            "{}: {} x {}-{} @ RIR {}",
            exercise.name,
            sets,
            min_rep_range,
            max_rep_range,
            rir
        );

        Prescription {
            sets,
            min_rep_range,
            max_rep_range,
            rir,
            rpe,
            weight: 0.0,
        }
    }
}
