//! Session blueprint library.
//!
//! Pre-authored templates for 1-5 training days. Each routine is an ordered
//! list of slots; every slot asks for one exercise of a pattern and role.
//! Differentiation grows with day count: full body for 1-3 days, an
//! upper/lower split for 4, push/pull/legs plus upper/lower for 5.

use crate::types::{MovementPattern, MovementSubpattern, Role};
use once_cell::sync::Lazy;

use MovementPattern as P;
use MovementSubpattern as S;

/// One position in a routine
#[derive(Clone, Debug, PartialEq)]
pub struct SlotDefinition {
    pub pattern: MovementPattern,
    pub role: Role,
    pub subpattern_preference: Option<MovementSubpattern>,
    /// Substitutes worth suggesting when the slot cannot be filled
    pub alternative_patterns: &'static [MovementPattern],
}

impl SlotDefinition {
    fn main(pattern: MovementPattern) -> Self {
        Self {
            pattern,
            role: Role::Main,
            subpattern_preference: None,
            alternative_patterns: &[],
        }
    }

    fn accessory(pattern: MovementPattern) -> Self {
        Self {
            pattern,
            role: Role::Accessory,
            subpattern_preference: None,
            alternative_patterns: &[],
        }
    }

    fn prefer(mut self, sub: MovementSubpattern) -> Self {
        self.subpattern_preference = Some(sub);
        self
    }

    fn suggest(mut self, alternatives: &'static [MovementPattern]) -> Self {
        self.alternative_patterns = alternatives;
        self
    }
}

/// A routine: name plus its ordered slots
pub type RoutineBlueprint = (&'static str, Vec<SlotDefinition>);

/// All routines for one training-day count, in training order
pub type SessionBlueprint = Vec<RoutineBlueprint>;

/// Supported training-day counts
pub const SUPPORTED_DAYS: std::ops::RangeInclusive<u8> = 1..=5;

static BLUEPRINTS: Lazy<[SessionBlueprint; 5]> = Lazy::new(|| {
    [one_day(), two_day(), three_day(), four_day(), five_day()]
});

/// Look up the blueprint for a training-day count.
///
/// Unknown day counts fall back to the 2-day blueprint.
pub fn get_blueprint(training_days: u8) -> &'static SessionBlueprint {
    if SUPPORTED_DAYS.contains(&training_days) {
        &BLUEPRINTS[usize::from(training_days) - 1]
    } else {
        tracing::warn!(
            "No blueprint for {} training days, falling back to 2 days",
            training_days
        );
        &BLUEPRINTS[1]
    }
}

fn one_day() -> SessionBlueprint {
    vec![(
        "A",
        vec![
            SlotDefinition::main(P::Squat).prefer(S::BilateralSquat),
            SlotDefinition::main(P::HorizontalPush).suggest(&[P::VerticalPush]),
            SlotDefinition::main(P::HorizontalPull).suggest(&[P::VerticalPull]),
            SlotDefinition::accessory(P::Hinge).prefer(S::RomanianDeadlift),
            SlotDefinition::accessory(P::VerticalPull).suggest(&[P::HorizontalPull]),
            SlotDefinition::accessory(P::VerticalPush),
            SlotDefinition::accessory(P::CoreStatic).suggest(&[P::CoreDynamic]),
        ],
    )]
}

fn two_day() -> SessionBlueprint {
    vec![
        (
            "A",
            vec![
                SlotDefinition::main(P::Squat).prefer(S::BilateralSquat),
                SlotDefinition::main(P::HorizontalPush).prefer(S::BenchPress),
                SlotDefinition::main(P::HorizontalPull).prefer(S::Row),
                SlotDefinition::accessory(P::Hinge).prefer(S::HipThrust),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::LateralRaise),
                SlotDefinition::accessory(P::CoreStatic).suggest(&[P::CoreDynamic]),
            ],
        ),
        (
            "B",
            vec![
                SlotDefinition::main(P::Hinge).prefer(S::Deadlift),
                SlotDefinition::main(P::VerticalPush).suggest(&[P::HorizontalPush]),
                SlotDefinition::main(P::VerticalPull).suggest(&[P::HorizontalPull]),
                SlotDefinition::accessory(P::Squat).prefer(S::SplitSquat),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::BicepsCurl),
                SlotDefinition::accessory(P::CoreDynamic).suggest(&[P::CoreStatic]),
            ],
        ),
    ]
}

fn three_day() -> SessionBlueprint {
    vec![
        (
            "A",
            vec![
                SlotDefinition::main(P::Squat).prefer(S::BilateralSquat),
                SlotDefinition::main(P::HorizontalPush).prefer(S::BenchPress),
                SlotDefinition::main(P::HorizontalPull).prefer(S::Row),
                SlotDefinition::accessory(P::Hinge).prefer(S::HipThrust),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::TricepsExtension),
                SlotDefinition::accessory(P::CoreStatic).prefer(S::Plank),
            ],
        ),
        (
            "B",
            vec![
                SlotDefinition::main(P::Hinge).prefer(S::Deadlift),
                SlotDefinition::main(P::VerticalPush).prefer(S::OverheadPress),
                SlotDefinition::main(P::VerticalPull).suggest(&[P::HorizontalPull]),
                SlotDefinition::accessory(P::Squat).prefer(S::SplitSquat),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::BicepsCurl),
                SlotDefinition::accessory(P::CoreDynamic).prefer(S::LegRaise),
            ],
        ),
        (
            "C",
            vec![
                SlotDefinition::main(P::Squat).prefer(S::Lunge),
                SlotDefinition::main(P::HorizontalPush).prefer(S::Pushup),
                SlotDefinition::main(P::HorizontalPull).prefer(S::InvertedRow),
                SlotDefinition::accessory(P::Hinge).prefer(S::RomanianDeadlift),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::RearDeltFly),
                SlotDefinition::accessory(P::LowerIsolation).prefer(S::CalfRaise),
                SlotDefinition::accessory(P::CoreStatic).prefer(S::SidePlank),
            ],
        ),
    ]
}

fn four_day() -> SessionBlueprint {
    vec![
        (
            "A",
            vec![
                SlotDefinition::main(P::HorizontalPush).prefer(S::BenchPress),
                SlotDefinition::main(P::HorizontalPull).prefer(S::Row),
                SlotDefinition::accessory(P::VerticalPush).prefer(S::OverheadPress),
                SlotDefinition::accessory(P::VerticalPull).prefer(S::Pulldown),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::BicepsCurl),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::TricepsExtension),
            ],
        ),
        (
            "B",
            vec![
                SlotDefinition::main(P::Squat).prefer(S::BilateralSquat),
                SlotDefinition::main(P::Hinge).prefer(S::RomanianDeadlift),
                SlotDefinition::accessory(P::Squat).prefer(S::SplitSquat),
                SlotDefinition::accessory(P::LowerIsolation).prefer(S::LegCurl),
                SlotDefinition::accessory(P::LowerIsolation).prefer(S::CalfRaise),
                SlotDefinition::accessory(P::CoreStatic).suggest(&[P::CoreDynamic]),
            ],
        ),
        (
            "C",
            vec![
                SlotDefinition::main(P::VerticalPush).prefer(S::OverheadPress),
                SlotDefinition::main(P::VerticalPull).prefer(S::Pullup),
                SlotDefinition::accessory(P::HorizontalPush).prefer(S::Pushup),
                SlotDefinition::accessory(P::HorizontalPull).prefer(S::FacePull),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::LateralRaise),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::ChestFly),
            ],
        ),
        (
            "D",
            vec![
                SlotDefinition::main(P::Hinge).prefer(S::Deadlift),
                SlotDefinition::main(P::Squat).prefer(S::LegPress).suggest(&[P::LowerIsolation]),
                SlotDefinition::accessory(P::Hinge).prefer(S::HipThrust),
                SlotDefinition::accessory(P::LowerIsolation).prefer(S::LegExtension),
                SlotDefinition::accessory(P::LowerIsolation).prefer(S::HipAbduction),
                SlotDefinition::accessory(P::CoreDynamic).suggest(&[P::CoreStatic]),
            ],
        ),
    ]
}

fn five_day() -> SessionBlueprint {
    vec![
        (
            "A",
            vec![
                SlotDefinition::main(P::HorizontalPush).prefer(S::BenchPress),
                SlotDefinition::main(P::VerticalPush).prefer(S::OverheadPress),
                SlotDefinition::accessory(P::HorizontalPush).prefer(S::Dip),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::LateralRaise),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::TricepsExtension),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::ChestFly),
            ],
        ),
        (
            "B",
            vec![
                SlotDefinition::main(P::VerticalPull).prefer(S::Pullup),
                SlotDefinition::main(P::HorizontalPull).prefer(S::Row),
                SlotDefinition::accessory(P::HorizontalPull).prefer(S::FacePull),
                SlotDefinition::accessory(P::VerticalPull).prefer(S::Pulldown),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::BicepsCurl),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::RearDeltFly),
            ],
        ),
        (
            "C",
            vec![
                SlotDefinition::main(P::Squat).prefer(S::BilateralSquat),
                SlotDefinition::main(P::Hinge).prefer(S::RomanianDeadlift),
                SlotDefinition::accessory(P::Squat).prefer(S::Lunge),
                SlotDefinition::accessory(P::LowerIsolation).prefer(S::LegExtension),
                SlotDefinition::accessory(P::LowerIsolation).prefer(S::CalfRaise),
                SlotDefinition::accessory(P::CoreDynamic).suggest(&[P::CoreStatic]),
            ],
        ),
        (
            "D",
            vec![
                SlotDefinition::main(P::HorizontalPush).prefer(S::Pushup),
                SlotDefinition::main(P::HorizontalPull).prefer(S::InvertedRow),
                SlotDefinition::main(P::VerticalPush).suggest(&[P::HorizontalPush]),
                SlotDefinition::accessory(P::VerticalPull).prefer(S::Chinup),
                SlotDefinition::accessory(P::UpperIsolation).prefer(S::Shrug),
                SlotDefinition::accessory(P::CoreStatic).suggest(&[P::CoreDynamic]),
            ],
        ),
        (
            "E",
            vec![
                SlotDefinition::main(P::Hinge).prefer(S::Deadlift),
                SlotDefinition::main(P::Squat).prefer(S::SplitSquat),
                SlotDefinition::accessory(P::Hinge).prefer(S::HipThrust),
                SlotDefinition::accessory(P::LowerIsolation).prefer(S::LegCurl),
                SlotDefinition::accessory(P::LowerIsolation).prefer(S::GluteKickback),
                SlotDefinition::accessory(P::CoreDynamic).prefer(S::Rollout),
            ],
        ),
    ]
}
