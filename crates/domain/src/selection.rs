//! Exercise selection
//!
//! Picks the exercises for a training day from a candidate list. The candidates are scanned in
//! their given order and accepted greedily, so the result only depends on the input. When the
//! strict filter does not yield enough exercises, the constraints are relaxed one at a time.

use std::collections::HashSet;

use crate::{Exercise, ExerciseID, Focus, Goal, Intensity};

/// The filters applied in each round, from strictest to most relaxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Body part, difficulty ceiling, goal tag and one exercise per category.
    Strict,
    RelaxedGoal,
    RelaxedDifficulty,
    /// Only the body part is checked.
    RelaxedCategory,
}

impl Tier {
    pub const CASCADE: [Tier; 4] = [
        Tier::Strict,
        Tier::RelaxedGoal,
        Tier::RelaxedDifficulty,
        Tier::RelaxedCategory,
    ];

    fn matches_goal(self) -> bool {
        self == Tier::Strict
    }

    fn limits_difficulty(self) -> bool {
        self <= Tier::RelaxedGoal
    }

    fn unique_category(self) -> bool {
        self <= Tier::RelaxedDifficulty
    }
}

/// What the user brings to the selection.
#[derive(Debug, Clone, Copy)]
pub struct Criteria<'a> {
    pub goal: &'a Goal,
    pub intensity: Intensity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub exercises: Vec<Exercise>,
    pub tier: Tier,
}

impl Selection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

/// Candidates training one of the body parts of `focus`.
#[must_use]
pub fn filter_by_focus(candidates: &[Exercise], focus: Focus) -> Vec<Exercise> {
    candidates
        .iter()
        .filter(|e| e.targets_any(focus.body_parts()))
        .cloned()
        .collect()
}

#[must_use]
pub fn select_exercises(
    candidates: &[Exercise],
    criteria: Criteria,
    focus: Focus,
    max_count: usize,
) -> Selection {
    let mut selection = Selection {
        exercises: vec![],
        tier: Tier::Strict,
    };

    for tier in Tier::CASCADE {
        selection = Selection {
            exercises: filter_with_criteria(candidates, criteria, focus, tier, max_count),
            tier,
        };
        if selection.exercises.len() >= max_count {
            break;
        }
    }

    selection
}

/// Last resort when the cascade found nothing.
#[must_use]
pub fn body_part_scan(candidates: &[Exercise], focus: Focus, max_count: usize) -> Vec<Exercise> {
    let body_parts = focus.body_parts();
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|e| e.targets_any(body_parts) && seen.insert(e.id))
        .take(max_count)
        .cloned()
        .collect()
}

fn filter_with_criteria(
    candidates: &[Exercise],
    criteria: Criteria,
    focus: Focus,
    tier: Tier,
    max_count: usize,
) -> Vec<Exercise> {
    let body_parts = focus.body_parts();
    let mut used_ids: HashSet<ExerciseID> = HashSet::new();
    let mut used_categories: HashSet<&str> = HashSet::new();
    let mut selected = vec![];

    for exercise in candidates {
        if selected.len() >= max_count {
            break;
        }
        if !exercise.targets_any(body_parts) || used_ids.contains(&exercise.id) {
            continue;
        }
        if tier.limits_difficulty() && exercise.difficulty_rank() > criteria.intensity.rank() {
            continue;
        }
        if tier.matches_goal() && !exercise.serves_goal(criteria.goal) {
            continue;
        }
        if tier.unique_category() && used_categories.contains(exercise.category.as_str()) {
            continue;
        }

        used_ids.insert(exercise.id);
        used_categories.insert(exercise.category.as_str());
        selected.push(exercise.clone());
    }

    selected
}
