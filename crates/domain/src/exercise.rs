use std::collections::BTreeMap;

use derive_more::{Deref, Display};

use crate::{Goal, Intensity, ReadError};

/// Goal tag that matches every training goal.
pub const GENERAL_FITNESS_TAG: &str = "General Fitness";

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
}

/// Read-only access to the exercise library.
///
/// Implementations must never return soft-deleted entries and must preserve the catalog order
/// in every list they return, as the selection depends on it for tie breaking.
#[allow(async_fn_in_trait)]
pub trait CatalogRepository {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    async fn read_exercises_by_ids(
        &self,
        ids: &[ExerciseID],
    ) -> Result<BTreeMap<ExerciseID, Exercise>, ReadError>;
    async fn read_exercises_by_goal_and_equipment(
        &self,
        goal: &Goal,
        equipment: &[String],
    ) -> Result<Vec<Exercise>, ReadError>;
    async fn read_exercises_by_body_parts_and_equipment(
        &self,
        body_parts: &[&str],
        equipment: &[String],
        exclude: &[ExerciseID],
    ) -> Result<Vec<Exercise>, ReadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: String,
    pub body_part: String,
    pub difficulty: Option<Intensity>,
    pub category: String,
    pub exercise_type: String,
    pub goal_tag: String,
    pub equipment: String,
    pub description: String,
    pub instructions: String,
}

impl Exercise {
    /// Rank of the difficulty, an unknown difficulty is treated as the most demanding one.
    #[must_use]
    pub fn difficulty_rank(&self) -> u8 {
        self.difficulty.map_or(Intensity::Advanced.rank(), Intensity::rank)
    }

    #[must_use]
    pub fn serves_goal(&self, goal: &Goal) -> bool {
        self.goal_tag.eq_ignore_ascii_case(goal.as_str())
            || self.goal_tag.eq_ignore_ascii_case(GENERAL_FITNESS_TAG)
    }

    #[must_use]
    pub fn targets_any(&self, body_parts: &[&str]) -> bool {
        body_parts
            .iter()
            .any(|part| part.eq_ignore_ascii_case(&self.body_part))
    }

    /// An empty equipment list places no restriction. Otherwise the equipment requirement must
    /// mention at least one of the listed items.
    #[must_use]
    pub fn usable_with(&self, equipment: &[String]) -> bool {
        if equipment.is_empty() {
            return true;
        }
        let required = self.equipment.to_lowercase();
        equipment
            .iter()
            .map(|e| e.trim().to_lowercase())
            .any(|e| required.contains(&e))
    }
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(u64);

impl ExerciseID {
    /// The placeholder used by rest days.
    #[must_use]
    pub fn nil() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for ExerciseID {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
