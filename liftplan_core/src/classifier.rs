//! Movement pattern classifier.
//!
//! Maps an exercise name (plus optional muscle/mechanic hints) onto the
//! movement taxonomy. The keyword table is plain data; it is sorted once by
//! keyword length so that specific phrases ("bulgarian split squat") win over
//! generic ones ("squat").

use crate::types::{MovementPattern, MovementSubpattern};
use once_cell::sync::Lazy;

use MovementPattern as P;
use MovementSubpattern as S;

/// Result of classifying an exercise
pub type Classification = (Option<MovementPattern>, Option<MovementSubpattern>);

/// Keyword → (pattern, subpattern). Order here is irrelevant.
const KEYWORDS: &[(&str, MovementPattern, MovementSubpattern)] = &[
    // Squat
    ("squat", P::Squat, S::BilateralSquat),
    ("back squat", P::Squat, S::BilateralSquat),
    ("front squat", P::Squat, S::BilateralSquat),
    ("goblet squat", P::Squat, S::BilateralSquat),
    ("hack squat", P::Squat, S::BilateralSquat),
    ("split squat", P::Squat, S::SplitSquat),
    ("bulgarian split squat", P::Squat, S::SplitSquat),
    ("pistol", P::Squat, S::SplitSquat),
    ("lunge", P::Squat, S::Lunge),
    ("leg press", P::Squat, S::LegPress),
    ("step-up", P::Squat, S::StepUp),
    ("step up", P::Squat, S::StepUp),
    // Hinge
    ("deadlift", P::Hinge, S::Deadlift),
    ("romanian deadlift", P::Hinge, S::RomanianDeadlift),
    ("stiff-leg deadlift", P::Hinge, S::RomanianDeadlift),
    ("stiff leg deadlift", P::Hinge, S::RomanianDeadlift),
    ("single leg deadlift", P::Hinge, S::RomanianDeadlift),
    ("rdl", P::Hinge, S::RomanianDeadlift),
    ("hip thrust", P::Hinge, S::HipThrust),
    ("glute bridge", P::Hinge, S::HipThrust),
    ("good morning", P::Hinge, S::GoodMorning),
    ("back extension", P::Hinge, S::GoodMorning),
    ("hyperextension", P::Hinge, S::GoodMorning),
    ("kettlebell swing", P::Hinge, S::KettlebellSwing),
    ("swing", P::Hinge, S::KettlebellSwing),
    // Horizontal push
    ("bench press", P::HorizontalPush, S::BenchPress),
    ("chest press", P::HorizontalPush, S::BenchPress),
    ("floor press", P::HorizontalPush, S::BenchPress),
    ("push-up", P::HorizontalPush, S::Pushup),
    ("push up", P::HorizontalPush, S::Pushup),
    ("pushup", P::HorizontalPush, S::Pushup),
    ("dip", P::HorizontalPush, S::Dip),
    // Vertical push
    ("overhead press", P::VerticalPush, S::OverheadPress),
    ("shoulder press", P::VerticalPush, S::OverheadPress),
    ("military press", P::VerticalPush, S::OverheadPress),
    ("push press", P::VerticalPush, S::OverheadPress),
    ("arnold press", P::VerticalPush, S::OverheadPress),
    ("pike push-up", P::VerticalPush, S::OverheadPress),
    ("pike push up", P::VerticalPush, S::OverheadPress),
    ("handstand push-up", P::VerticalPush, S::OverheadPress),
    ("landmine press", P::VerticalPush, S::LandminePress),
    // Horizontal pull
    ("row", P::HorizontalPull, S::Row),
    ("bent over row", P::HorizontalPull, S::Row),
    ("seated cable row", P::HorizontalPull, S::Row),
    ("inverted row", P::HorizontalPull, S::InvertedRow),
    ("trx row", P::HorizontalPull, S::InvertedRow),
    ("face pull", P::HorizontalPull, S::FacePull),
    // Vertical pull
    ("pull-up", P::VerticalPull, S::Pullup),
    ("pull up", P::VerticalPull, S::Pullup),
    ("pullup", P::VerticalPull, S::Pullup),
    ("chin-up", P::VerticalPull, S::Chinup),
    ("chin up", P::VerticalPull, S::Chinup),
    ("chinup", P::VerticalPull, S::Chinup),
    ("pulldown", P::VerticalPull, S::Pulldown),
    ("pull-down", P::VerticalPull, S::Pulldown),
    ("straight arm pulldown", P::VerticalPull, S::Pulldown),
    // Core static
    ("plank", P::CoreStatic, S::Plank),
    ("hollow hold", P::CoreStatic, S::Plank),
    ("dead bug", P::CoreStatic, S::Plank),
    ("side plank", P::CoreStatic, S::SidePlank),
    ("pallof", P::CoreStatic, S::AntiRotation),
    ("suitcase carry", P::CoreStatic, S::AntiRotation),
    ("farmer", P::CoreStatic, S::AntiRotation),
    // Core dynamic
    ("crunch", P::CoreDynamic, S::Crunch),
    ("sit-up", P::CoreDynamic, S::Crunch),
    ("sit up", P::CoreDynamic, S::Crunch),
    ("leg raise", P::CoreDynamic, S::LegRaise),
    ("knee raise", P::CoreDynamic, S::LegRaise),
    ("russian twist", P::CoreDynamic, S::Rotation),
    ("woodchop", P::CoreDynamic, S::Rotation),
    ("wood chop", P::CoreDynamic, S::Rotation),
    ("ab wheel", P::CoreDynamic, S::Rollout),
    ("rollout", P::CoreDynamic, S::Rollout),
    ("mountain climber", P::CoreDynamic, S::Crunch),
    // Upper isolation
    ("curl", P::UpperIsolation, S::BicepsCurl),
    ("biceps curl", P::UpperIsolation, S::BicepsCurl),
    ("hammer curl", P::UpperIsolation, S::BicepsCurl),
    ("triceps extension", P::UpperIsolation, S::TricepsExtension),
    ("tricep extension", P::UpperIsolation, S::TricepsExtension),
    ("skull crusher", P::UpperIsolation, S::TricepsExtension),
    ("pushdown", P::UpperIsolation, S::TricepsExtension),
    ("triceps kickback", P::UpperIsolation, S::TricepsExtension),
    ("lateral raise", P::UpperIsolation, S::LateralRaise),
    ("front raise", P::UpperIsolation, S::LateralRaise),
    ("upright row", P::UpperIsolation, S::LateralRaise),
    ("fly", P::UpperIsolation, S::ChestFly),
    ("flye", P::UpperIsolation, S::ChestFly),
    ("pec deck", P::UpperIsolation, S::ChestFly),
    ("crossover", P::UpperIsolation, S::ChestFly),
    ("rear delt", P::UpperIsolation, S::RearDeltFly),
    ("reverse fly", P::UpperIsolation, S::RearDeltFly),
    ("shrug", P::UpperIsolation, S::Shrug),
    // Lower isolation
    ("leg extension", P::LowerIsolation, S::LegExtension),
    ("leg curl", P::LowerIsolation, S::LegCurl),
    ("hamstring curl", P::LowerIsolation, S::LegCurl),
    ("nordic curl", P::LowerIsolation, S::LegCurl),
    ("calf raise", P::LowerIsolation, S::CalfRaise),
    ("hip abduction", P::LowerIsolation, S::HipAbduction),
    ("clamshell", P::LowerIsolation, S::HipAbduction),
    ("lateral band walk", P::LowerIsolation, S::HipAbduction),
    ("glute kickback", P::LowerIsolation, S::GluteKickback),
    ("donkey kick", P::LowerIsolation, S::GluteKickback),
];

/// Keyword table sorted by keyword length, longest first
static SORTED_KEYWORDS: Lazy<Vec<(&'static str, MovementPattern, MovementSubpattern)>> =
    Lazy::new(|| {
        let mut table = KEYWORDS.to_vec();
        // Stable sort keeps declaration order among equal-length keywords
        table.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        table
    });

/// Primary muscle group → pattern fallback
const MUSCLE_FALLBACK: &[(&str, MovementPattern)] = &[
    ("quadriceps", P::Squat),
    ("quads", P::Squat),
    ("glutes", P::Hinge),
    ("hamstrings", P::Hinge),
    ("lower back", P::Hinge),
    ("chest", P::HorizontalPush),
    ("shoulders", P::VerticalPush),
    ("front shoulders", P::VerticalPush),
    ("lats", P::VerticalPull),
    ("latissimus dorsi", P::VerticalPull),
    ("middle back", P::HorizontalPull),
    ("upper back", P::HorizontalPull),
    ("traps", P::UpperIsolation),
    ("rear shoulders", P::UpperIsolation),
    ("biceps", P::UpperIsolation),
    ("triceps", P::UpperIsolation),
    ("forearms", P::UpperIsolation),
    ("abdominals", P::CoreDynamic),
    ("abs", P::CoreDynamic),
    ("obliques", P::CoreDynamic),
    ("calves", P::LowerIsolation),
    ("adductors", P::LowerIsolation),
    ("abductors", P::LowerIsolation),
];

/// Classify an exercise into a (pattern, subpattern) pair.
///
/// Returns `(None, None)` when neither the name nor the muscle hint is
/// recognised; such exercises never match a pattern slot.
pub fn classify(
    name: &str,
    primary_muscle: Option<&str>,
    mechanic: Option<&str>,
) -> Classification {
    let lowered = name.to_lowercase();

    if let Some((_, pattern, sub)) = SORTED_KEYWORDS
        .iter()
        .find(|(keyword, _, _)| lowered.contains(keyword))
    {
        return (Some(*pattern), Some(*sub));
    }

    let Some(muscle) = primary_muscle.map(|m| m.trim().to_lowercase()) else {
        return (None, None);
    };

    let fallback = MUSCLE_FALLBACK
        .iter()
        .find(|(group, _)| *group == muscle)
        .map(|(_, pattern)| *pattern);

    match fallback {
        Some(pattern) if is_isolation_mechanic(mechanic) => (Some(demote(pattern)), None),
        Some(pattern) => (Some(pattern), None),
        None => (None, None),
    }
}

/// All keywords that map onto a subpattern
pub fn subpattern_keywords(sub: MovementSubpattern) -> impl Iterator<Item = &'static str> {
    KEYWORDS
        .iter()
        .filter(move |(_, _, s)| *s == sub)
        .map(|(keyword, _, _)| *keyword)
}

pub(crate) fn is_isolation_mechanic(mechanic: Option<&str>) -> bool {
    matches!(
        mechanic.map(|m| m.trim().to_lowercase()).as_deref(),
        Some("isolated") | Some("isolation")
    )
}

/// Compound pattern → the isolation pattern on the same half of the body
fn demote(pattern: MovementPattern) -> MovementPattern {
    match pattern {
        P::Squat | P::Hinge => P::LowerIsolation,
        P::HorizontalPush | P::VerticalPush | P::HorizontalPull | P::VerticalPull => {
            P::UpperIsolation
        }
        other => other,
    }
}
