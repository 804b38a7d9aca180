use chrono::{DateTime, Datelike, Local, Utc};
use derive_more::{Deref, Display};

use crate::{
    BmiInfo, CaloriesBurned, DeleteError, ExerciseID, Focus, Goal, NutritionTarget, PlanError,
    ReadError, SplitType, StorageError, UpdateError, UserID,
};

#[allow(async_fn_in_trait)]
pub trait PlanService {
    /// Replaces the active plan of the user by a newly generated one.
    ///
    /// Either the complete plan is stored or nothing is changed.
    async fn generate_plan(&self, user_id: UserID) -> Result<WorkoutPlan, PlanError>;
    async fn get_plan(&self, user_id: UserID) -> Result<PlanOverview, PlanError>;
    async fn delete_plan(&self, user_id: UserID) -> Result<PlanID, PlanError>;
    async fn get_workout_for_day(
        &self,
        user_id: UserID,
        day_number: u32,
    ) -> Result<DayWorkout, PlanError>;
    async fn replace_exercise(
        &self,
        user_id: UserID,
        original: ExerciseID,
        new: ExerciseID,
    ) -> Result<WorkoutPlanExercise, PlanError>;
    async fn edit_reps(
        &self,
        user_id: UserID,
        plan_exercise_id: PlanExerciseID,
        reps: Reps,
    ) -> Result<WorkoutPlanExercise, PlanError>;
    async fn get_recommended_replacements(
        &self,
        user_id: UserID,
    ) -> Result<Vec<Replacement>, PlanError>;

    async fn get_workout_today(&self, user_id: UserID) -> Result<DayWorkout, PlanError> {
        self.get_workout_for_day(user_id, Local::now().weekday().number_from_monday())
            .await
    }
}

/// Access to the stored plans.
///
/// Only the active plan of a user is visible. Days are ordered by day number and exercises by
/// their order within the day.
#[allow(async_fn_in_trait)]
pub trait PlanRepository {
    type Transaction: PlanTransaction;

    async fn read_active_plan(&self, user_id: UserID) -> Result<WorkoutPlan, ReadError>;
    async fn begin(&self) -> Result<Self::Transaction, StorageError>;
    async fn update_exercise_in_plan(
        &self,
        id: PlanExerciseID,
        exercise_id: ExerciseID,
    ) -> Result<WorkoutPlanExercise, UpdateError>;
    async fn update_reps(
        &self,
        id: PlanExerciseID,
        reps: Reps,
    ) -> Result<WorkoutPlanExercise, UpdateError>;
    async fn delete_active_plan(&self, user_id: UserID) -> Result<PlanID, DeleteError>;
}

/// Unit of work for writing a plan.
///
/// Nothing becomes visible before `commit`. Dropping the transaction without committing
/// discards all staged writes.
#[allow(async_fn_in_trait)]
pub trait PlanTransaction {
    async fn delete_active_plans(&mut self, user_id: UserID) -> Result<(), StorageError>;
    async fn create_plan(
        &mut self,
        user_id: UserID,
        split_type: &SplitType,
        goal: &Goal,
    ) -> Result<PlanID, StorageError>;
    async fn create_day(
        &mut self,
        plan_id: PlanID,
        day_number: u32,
        focus: Focus,
    ) -> Result<DayID, StorageError>;
    async fn create_plan_exercise(
        &mut self,
        day_id: DayID,
        exercise: NewPlanExercise,
    ) -> Result<PlanExerciseID, StorageError>;
    async fn commit(self) -> Result<(), StorageError>;
    async fn rollback(self) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutPlan {
    pub id: PlanID,
    pub user_id: UserID,
    pub split_type: SplitType,
    pub goal: Goal,
    pub created_at: DateTime<Utc>,
    pub days: Vec<WorkoutPlanDay>,
}

impl WorkoutPlan {
    /// All exercise rows in plan order.
    pub fn exercises(&self) -> impl Iterator<Item = &WorkoutPlanExercise> {
        self.days.iter().flat_map(|d| d.exercises.iter())
    }

    #[must_use]
    pub fn day(&self, day_number: u32) -> Option<&WorkoutPlanDay> {
        self.days.iter().find(|d| d.day_number == day_number)
    }

    #[must_use]
    pub fn exercise_ids(&self) -> Vec<ExerciseID> {
        let mut ids = self
            .exercises()
            .filter(|e| !e.is_rest())
            .map(|e| e.exercise_id)
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutPlanDay {
    pub id: DayID,
    pub day_number: u32,
    pub focus: Focus,
    pub exercises: Vec<WorkoutPlanExercise>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutPlanExercise {
    pub id: PlanExerciseID,
    pub exercise_id: ExerciseID,
    pub order: u32,
    pub reps: u32,
    pub sets: u32,
    pub note: Option<String>,
}

impl WorkoutPlanExercise {
    #[must_use]
    pub fn is_rest(&self) -> bool {
        self.exercise_id.is_nil()
    }
}

/// Exercise row to be created inside a [`PlanTransaction`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlanExercise {
    pub exercise_id: ExerciseID,
    pub order: u32,
    pub reps: u32,
    pub sets: u32,
    pub note: Option<String>,
}

impl NewPlanExercise {
    /// The single entry of a rest day.
    #[must_use]
    pub fn rest() -> Self {
        Self {
            exercise_id: ExerciseID::nil(),
            order: 0,
            reps: 0,
            sets: 0,
            note: None,
        }
    }
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlanID(u64);

impl From<u64> for PlanID {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DayID(u64);

impl From<u64> for DayID {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlanExerciseID(u64);

impl From<u64> for PlanExerciseID {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Deref, Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(1..=100).contains(&value) {
            return Err(RepsError::OutOfRange(value));
        }
        Ok(Self(value))
    }
}

impl TryFrom<u32> for Reps {
    type Error = RepsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Reps::new(value)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RepsError {
    #[error("Reps must be in the range 1 to 100 ({0})")]
    OutOfRange(u32),
}

/// A plan as presented to the user, with catalog details and derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOverview {
    pub plan_id: PlanID,
    pub split_type: SplitType,
    pub goal: Goal,
    pub created_at: DateTime<Utc>,
    pub days: Vec<DayOverview>,
    pub bmi: BmiInfo,
    pub calories: CaloriesBurned,
    pub nutrition: NutritionTarget,
    pub training_advice: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayOverview {
    pub id: DayID,
    pub day_number: u32,
    pub focus: Focus,
    pub exercises: Vec<PlannedExercise>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedExercise {
    pub plan_exercise_id: PlanExerciseID,
    pub exercise_id: ExerciseID,
    pub name: String,
    pub body_part: String,
    pub equipment: String,
    pub goal_tag: String,
    pub order: u32,
    pub reps: u32,
    pub sets: u32,
    pub note: Option<String>,
}

pub const REST_DAY_NAME: &str = "Rest Day";

impl PlannedExercise {
    #[must_use]
    pub fn rest(row: &WorkoutPlanExercise) -> Self {
        Self {
            plan_exercise_id: row.id,
            exercise_id: ExerciseID::nil(),
            name: REST_DAY_NAME.to_string(),
            body_part: String::new(),
            equipment: String::new(),
            goal_tag: String::new(),
            order: 0,
            reps: 0,
            sets: 0,
            note: row.note.clone(),
        }
    }

    #[must_use]
    pub fn is_rest(&self) -> bool {
        self.exercise_id.is_nil()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayWorkout {
    pub day: DayOverview,
    pub calories_burned: f64,
}

/// Alternatives for one exercise of the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    pub plan_exercise_id: PlanExerciseID,
    pub original_exercise_id: ExerciseID,
    pub name: String,
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    pub exercise_id: ExerciseID,
    pub name: String,
    pub description: String,
}
