//! Greedy per-routine volume balancing.
//!
//! Only the integer `sets` field is touched. Rows keep their order, rep
//! ranges and effort targets. Balancing is best effort: a routine may end up
//! outside the band when no legal adjustment remains.

use crate::types::{ExerciseRow, Role};

/// Lowest acceptable total sets per routine
pub const MIN_ROUTINE_SETS: u32 = 15;
/// Highest acceptable total sets per routine
pub const MAX_ROUTINE_SETS: u32 = 24;
/// Accessory rows are never trimmed below this
pub const MIN_ACCESSORY_SETS: u32 = 1;
/// Main rows are never raised above this
pub const MAX_MAIN_SETS: u32 = 5;
/// Fallback trimming leaves at least this many sets on any row
const FALLBACK_TRIM_FLOOR: u32 = 2;

/// Outcome of balancing one routine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceReport {
    pub total_sets: u32,
    pub in_band: bool,
    pub adjustments: u32,
}

pub fn total_sets(rows: &[ExerciseRow]) -> u32 {
    rows.iter().map(|r| r.sets).sum()
}

/// Nudge total sets toward [15, 24] in place.
pub fn balance(rows: &mut [ExerciseRow]) -> BalanceReport {
    let mut total = total_sets(rows);
    let mut adjustments = 0;

    while total > MAX_ROUTINE_SETS {
        let trim = rows
            .iter()
            .rposition(|r| r.role == Role::Accessory && r.sets > MIN_ACCESSORY_SETS)
            .or_else(|| rows.iter().rposition(|r| r.sets > FALLBACK_TRIM_FLOOR));

        match trim {
            Some(index) => {
                rows[index].sets -= 1;
                total -= 1;
                adjustments += 1;
            }
            None => break,
        }
    }

    while total < MIN_ROUTINE_SETS {
        match rows
            .iter()
            .position(|r| r.role == Role::Main && r.sets < MAX_MAIN_SETS)
        {
            Some(index) => {
                rows[index].sets += 1;
                total += 1;
                adjustments += 1;
            }
            None => break,
        }
    }

    let in_band = (MIN_ROUTINE_SETS..=MAX_ROUTINE_SETS).contains(&total);
    if adjustments > 0 {
        tracing::debug!(
            "Balanced routine to {} sets with {} adjustments",
            total,
            adjustments
        );
    }

    BalanceReport {
        total_sets: total,
        in_band,
        adjustments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovementPattern;

    fn row(order: u32, role: Role, sets: u32) -> ExerciseRow {
        ExerciseRow {
            routine: "A".into(),
            exercise: format!("Exercise {}", order),
            sets,
            min_rep_range: 8,
            max_rep_range: 12,
            rir: 2,
            rpe: 8.0,
            weight: 0.0,
            exercise_order: order,
            pattern: MovementPattern::Squat,
            role,
        }
    }

    fn sets(rows: &[ExerciseRow]) -> Vec<u32> {
        rows.iter().map(|r| r.sets).collect()
    }

    #[test]
    fn test_in_band_is_untouched() {
        let mut rows = vec![
            row(1, Role::Main, 4),
            row(2, Role::Main, 4),
            row(3, Role::Accessory, 3),
            row(4, Role::Accessory, 3),
            row(5, Role::Accessory, 3),
        ];
        let report = balance(&mut rows);
        assert_eq!(report, BalanceReport { total_sets: 17, in_band: true, adjustments: 0 });
        assert_eq!(sets(&rows), vec![4, 4, 3, 3, 3]);
    }

    #[test]
    fn test_over_budget_trims_last_accessory_first() {
        let mut rows = vec![
            row(1, Role::Main, 5),
            row(2, Role::Main, 5),
            row(3, Role::Accessory, 6),
            row(4, Role::Accessory, 6),
            row(5, Role::Accessory, 6),
        ];
        let report = balance(&mut rows);
        assert_eq!(report.total_sets, 24);
        assert!(report.in_band);
        // 28 → 24: the last accessory absorbs all four decrements
        assert_eq!(sets(&rows), vec![5, 5, 6, 6, 2]);
    }

    #[test]
    fn test_over_budget_falls_back_to_any_row_above_two() {
        let mut rows = vec![
            row(1, Role::Main, 10),
            row(2, Role::Main, 10),
            row(3, Role::Main, 10),
            row(4, Role::Accessory, 1),
        ];
        let report = balance(&mut rows);
        assert_eq!(report.total_sets, 24);
        assert_eq!(sets(&rows), vec![10, 10, 3, 1]);
    }

    #[test]
    fn test_over_budget_gives_up_when_nothing_can_shrink() {
        let mut rows: Vec<_> = (1..=13).map(|i| row(i, Role::Main, 2)).collect();
        let report = balance(&mut rows);
        assert_eq!(report.total_sets, 26);
        assert!(!report.in_band);
        assert_eq!(report.adjustments, 0);
    }

    #[test]
    fn test_under_budget_raises_first_main() {
        let mut rows = vec![
            row(1, Role::Main, 3),
            row(2, Role::Main, 3),
            row(3, Role::Accessory, 2),
            row(4, Role::Accessory, 2),
            row(5, Role::Accessory, 2),
        ];
        let report = balance(&mut rows);
        assert_eq!(report.total_sets, 15);
        assert!(report.in_band);
        assert_eq!(sets(&rows), vec![5, 4, 2, 2, 2]);
    }

    #[test]
    fn test_under_budget_stops_at_main_cap() {
        let mut rows = vec![row(1, Role::Main, 3), row(2, Role::Accessory, 2)];
        let report = balance(&mut rows);
        assert_eq!(report.total_sets, 7);
        assert!(!report.in_band);
        assert_eq!(sets(&rows), vec![5, 2]);
    }

    #[test]
    fn test_empty_routine_terminates() {
        let mut rows: Vec<ExerciseRow> = Vec::new();
        let report = balance(&mut rows);
        assert_eq!(report.total_sets, 0);
        assert!(!report.in_band);
    }

    #[test]
    fn test_only_sets_change() {
        let mut rows = vec![row(1, Role::Main, 1), row(2, Role::Accessory, 1)];
        let before = rows.clone();
        balance(&mut rows);
        for (after, before) in rows.iter().zip(&before) {
            assert_eq!(after.exercise, before.exercise);
            assert_eq!(after.exercise_order, before.exercise_order);
            assert_eq!(after.min_rep_range, before.min_rep_range);
            assert_eq!(after.rir, before.rir);
            assert!(after.role != Role::Accessory || after.sets >= 1);
        }
    }
}
