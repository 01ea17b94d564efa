//! Core domain types for the starter plan generator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Movement patterns and subpatterns
//! - Trainee profile enums (environment, experience, goal)
//! - Exercise catalog records
//! - Generated plan rows and warnings

use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Movement Taxonomy
// ============================================================================

/// Biomechanical category used as the slot-matching unit
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementPattern {
    Squat,
    Hinge,
    HorizontalPush,
    VerticalPush,
    HorizontalPull,
    VerticalPull,
    CoreStatic,
    CoreDynamic,
    UpperIsolation,
    LowerIsolation,
}

impl MovementPattern {
    pub const ALL: [MovementPattern; 10] = [
        MovementPattern::Squat,
        MovementPattern::Hinge,
        MovementPattern::HorizontalPush,
        MovementPattern::VerticalPush,
        MovementPattern::HorizontalPull,
        MovementPattern::VerticalPull,
        MovementPattern::CoreStatic,
        MovementPattern::CoreDynamic,
        MovementPattern::UpperIsolation,
        MovementPattern::LowerIsolation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementPattern::Squat => "SQUAT",
            MovementPattern::Hinge => "HINGE",
            MovementPattern::HorizontalPush => "HORIZONTAL_PUSH",
            MovementPattern::VerticalPush => "VERTICAL_PUSH",
            MovementPattern::HorizontalPull => "HORIZONTAL_PULL",
            MovementPattern::VerticalPull => "VERTICAL_PULL",
            MovementPattern::CoreStatic => "CORE_STATIC",
            MovementPattern::CoreDynamic => "CORE_DYNAMIC",
            MovementPattern::UpperIsolation => "UPPER_ISOLATION",
            MovementPattern::LowerIsolation => "LOWER_ISOLATION",
        }
    }

    pub fn is_core(&self) -> bool {
        matches!(self, MovementPattern::CoreStatic | MovementPattern::CoreDynamic)
    }

    pub fn is_isolation(&self) -> bool {
        matches!(
            self,
            MovementPattern::UpperIsolation | MovementPattern::LowerIsolation
        )
    }
}

impl fmt::Display for MovementPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_token(s).to_uppercase();
        MovementPattern::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| Error::Other(format!("Unknown movement pattern: {}", s)))
    }
}

/// Finer-grained variant within a movement pattern
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementSubpattern {
    // Squat
    BilateralSquat,
    SplitSquat,
    Lunge,
    LegPress,
    StepUp,
    // Hinge
    Deadlift,
    RomanianDeadlift,
    HipThrust,
    GoodMorning,
    KettlebellSwing,
    // Horizontal push
    BenchPress,
    Pushup,
    Dip,
    // Vertical push
    OverheadPress,
    LandminePress,
    // Horizontal pull
    Row,
    InvertedRow,
    FacePull,
    // Vertical pull
    Pullup,
    Chinup,
    Pulldown,
    // Core static
    Plank,
    SidePlank,
    AntiRotation,
    // Core dynamic
    Crunch,
    LegRaise,
    Rotation,
    Rollout,
    // Upper isolation
    BicepsCurl,
    TricepsExtension,
    LateralRaise,
    ChestFly,
    RearDeltFly,
    Shrug,
    // Lower isolation
    LegExtension,
    LegCurl,
    CalfRaise,
    HipAbduction,
    GluteKickback,
}

impl MovementSubpattern {
    pub const ALL: [MovementSubpattern; 39] = [
        MovementSubpattern::BilateralSquat,
        MovementSubpattern::SplitSquat,
        MovementSubpattern::Lunge,
        MovementSubpattern::LegPress,
        MovementSubpattern::StepUp,
        MovementSubpattern::Deadlift,
        MovementSubpattern::RomanianDeadlift,
        MovementSubpattern::HipThrust,
        MovementSubpattern::GoodMorning,
        MovementSubpattern::KettlebellSwing,
        MovementSubpattern::BenchPress,
        MovementSubpattern::Pushup,
        MovementSubpattern::Dip,
        MovementSubpattern::OverheadPress,
        MovementSubpattern::LandminePress,
        MovementSubpattern::Row,
        MovementSubpattern::InvertedRow,
        MovementSubpattern::FacePull,
        MovementSubpattern::Pullup,
        MovementSubpattern::Chinup,
        MovementSubpattern::Pulldown,
        MovementSubpattern::Plank,
        MovementSubpattern::SidePlank,
        MovementSubpattern::AntiRotation,
        MovementSubpattern::Crunch,
        MovementSubpattern::LegRaise,
        MovementSubpattern::Rotation,
        MovementSubpattern::Rollout,
        MovementSubpattern::BicepsCurl,
        MovementSubpattern::TricepsExtension,
        MovementSubpattern::LateralRaise,
        MovementSubpattern::ChestFly,
        MovementSubpattern::RearDeltFly,
        MovementSubpattern::Shrug,
        MovementSubpattern::LegExtension,
        MovementSubpattern::LegCurl,
        MovementSubpattern::CalfRaise,
        MovementSubpattern::HipAbduction,
        MovementSubpattern::GluteKickback,
    ];

    /// The pattern this subpattern belongs to
    pub fn pattern(&self) -> MovementPattern {
        use MovementSubpattern::*;
        match self {
            BilateralSquat | SplitSquat | Lunge | LegPress | StepUp => MovementPattern::Squat,
            Deadlift | RomanianDeadlift | HipThrust | GoodMorning | KettlebellSwing => {
                MovementPattern::Hinge
            }
            BenchPress | Pushup | Dip => MovementPattern::HorizontalPush,
            OverheadPress | LandminePress => MovementPattern::VerticalPush,
            Row | InvertedRow | FacePull => MovementPattern::HorizontalPull,
            Pullup | Chinup | Pulldown => MovementPattern::VerticalPull,
            Plank | SidePlank | AntiRotation => MovementPattern::CoreStatic,
            Crunch | LegRaise | Rotation | Rollout => MovementPattern::CoreDynamic,
            BicepsCurl | TricepsExtension | LateralRaise | ChestFly | RearDeltFly | Shrug => {
                MovementPattern::UpperIsolation
            }
            LegExtension | LegCurl | CalfRaise | HipAbduction | GluteKickback => {
                MovementPattern::LowerIsolation
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        use MovementSubpattern::*;
        match self {
            BilateralSquat => "BILATERAL_SQUAT",
            SplitSquat => "SPLIT_SQUAT",
            Lunge => "LUNGE",
            LegPress => "LEG_PRESS",
            StepUp => "STEP_UP",
            Deadlift => "DEADLIFT",
            RomanianDeadlift => "ROMANIAN_DEADLIFT",
            HipThrust => "HIP_THRUST",
            GoodMorning => "GOOD_MORNING",
            KettlebellSwing => "KETTLEBELL_SWING",
            BenchPress => "BENCH_PRESS",
            Pushup => "PUSHUP",
            Dip => "DIP",
            OverheadPress => "OVERHEAD_PRESS",
            LandminePress => "LANDMINE_PRESS",
            Row => "ROW",
            InvertedRow => "INVERTED_ROW",
            FacePull => "FACE_PULL",
            Pullup => "PULLUP",
            Chinup => "CHINUP",
            Pulldown => "PULLDOWN",
            Plank => "PLANK",
            SidePlank => "SIDE_PLANK",
            AntiRotation => "ANTI_ROTATION",
            Crunch => "CRUNCH",
            LegRaise => "LEG_RAISE",
            Rotation => "ROTATION",
            Rollout => "ROLLOUT",
            BicepsCurl => "BICEPS_CURL",
            TricepsExtension => "TRICEPS_EXTENSION",
            LateralRaise => "LATERAL_RAISE",
            ChestFly => "CHEST_FLY",
            RearDeltFly => "REAR_DELT_FLY",
            Shrug => "SHRUG",
            LegExtension => "LEG_EXTENSION",
            LegCurl => "LEG_CURL",
            CalfRaise => "CALF_RAISE",
            HipAbduction => "HIP_ABDUCTION",
            GluteKickback => "GLUTE_KICKBACK",
        }
    }
}

impl fmt::Display for MovementSubpattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementSubpattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_token(s).to_uppercase();
        MovementSubpattern::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| Error::Other(format!("Unknown movement subpattern: {}", s)))
    }
}

/// Lowercase, trim, and fold spaces/hyphens into underscores
pub(crate) fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

// ============================================================================
// Trainee Profile
// ============================================================================

/// Role of a slot within a session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Main,
    Accessory,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Main => "main",
            Role::Accessory => "accessory",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the trainee works out
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Gym,
    Home,
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gym" => Ok(Environment::Gym),
            "home" => Ok(Environment::Home),
            _ => Err(Error::Config(format!(
                "environment must be 'gym' or 'home', got '{}'",
                s
            ))),
        }
    }
}

/// Trainee experience level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Novice,
    Intermediate,
    Advanced,
}

impl FromStr for ExperienceLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "novice" => Ok(ExperienceLevel::Novice),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            _ => Err(Error::Config(format!(
                "experience_level must be novice, intermediate or advanced, got '{}'",
                s
            ))),
        }
    }
}

/// Training goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    Hypertrophy,
    Strength,
    General,
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hypertrophy" => Ok(Goal::Hypertrophy),
            "strength" => Ok(Goal::Strength),
            "general" => Ok(Goal::General),
            _ => Err(Error::Config(format!(
                "goal must be hypertrophy, strength or general, got '{}'",
                s
            ))),
        }
    }
}

// ============================================================================
// Catalog Records
// ============================================================================

/// An exercise as supplied by the catalog collaborator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ExerciseRecord {
    #[serde(rename = "exercise_name", alias = "name")]
    pub name: String,
    #[serde(default)]
    pub primary_muscle_group: Option<String>,
    #[serde(default)]
    pub secondary_muscle_group: Option<String>,
    #[serde(default)]
    pub mechanic: Option<String>,
    #[serde(default)]
    pub utility: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub movement_pattern: Option<String>,
    #[serde(default)]
    pub movement_subpattern: Option<String>,
}

impl ExerciseRecord {
    /// Minimal record carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Stored pattern hint, if present and recognised
    pub fn stored_pattern(&self) -> Option<MovementPattern> {
        self.movement_pattern
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| s.parse().ok())
    }

    /// Stored subpattern hint, if present and recognised
    pub fn stored_subpattern(&self) -> Option<MovementSubpattern> {
        self.movement_subpattern
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| s.parse().ok())
    }
}

// ============================================================================
// Generated Plan
// ============================================================================

/// One prescribed exercise inside a routine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseRow {
    pub routine: String,
    pub exercise: String,
    pub sets: u32,
    pub min_rep_range: u32,
    pub max_rep_range: u32,
    pub rir: u32,
    pub rpe: f64,
    pub weight: f64,
    pub exercise_order: u32,
    pub pattern: MovementPattern,
    pub role: Role,
}

/// Routines in blueprint order, each an ordered list of rows
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct GeneratedPlan {
    pub routines: Vec<(String, Vec<ExerciseRow>)>,
}

impl GeneratedPlan {
    pub fn routine(&self, name: &str) -> Option<&[ExerciseRow]> {
        self.routines
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rows)| rows.as_slice())
    }

    pub fn routine_names(&self) -> Vec<&str> {
        self.routines.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn total_exercises(&self) -> usize {
        self.routines.iter().map(|(_, rows)| rows.len()).sum()
    }

    pub fn sets_per_routine(&self) -> BTreeMap<String, u32> {
        self.routines
            .iter()
            .map(|(name, rows)| (name.clone(), rows.iter().map(|r| r.sets).sum()))
            .collect()
    }

    /// Rename a routine in place, rewriting the routine field of its rows
    pub fn rename_routine(&mut self, from: &str, to: &str) {
        for (name, rows) in self.routines.iter_mut().filter(|(n, _)| n == from) {
            *name = to.to_string();
            for row in rows.iter_mut() {
                row.routine = to.to_string();
            }
        }
    }
}

/// Soft failures reported alongside a generated plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationWarning {
    /// The catalog could not be read; every slot was skipped
    CatalogUnavailable { reason: String },
    /// No catalog record survived the hard filters for a slot
    UnfillableSlot {
        routine: String,
        slot_index: usize,
        pattern: MovementPattern,
        role: Role,
        alternatives: Vec<MovementPattern>,
    },
    /// Balancing could not bring the routine into the target band
    UnbalancedRoutine { routine: String, total_sets: u32 },
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationWarning::CatalogUnavailable { reason } => {
                write!(f, "catalog unavailable: {}", reason)
            }
            GenerationWarning::UnfillableSlot {
                routine,
                slot_index,
                pattern,
                role,
                alternatives,
            } => {
                write!(
                    f,
                    "routine {} slot {}: no {} exercise available for {} role",
                    routine,
                    slot_index + 1,
                    pattern,
                    role
                )?;
                if !alternatives.is_empty() {
                    let alts: Vec<&str> = alternatives.iter().map(|p| p.as_str()).collect();
                    write!(f, " (consider {})", alts.join(", "))?;
                }
                Ok(())
            }
            GenerationWarning::UnbalancedRoutine {
                routine,
                total_sets,
            } => write!(
                f,
                "routine {} has {} total sets, outside the balanced band",
                routine, total_sets
            ),
        }
    }
}
