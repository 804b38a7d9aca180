use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
};

use chrono::{DateTime, Utc};
use log::debug;
use wellplan_domain as domain;

/// Repository keeping all tables in memory.
///
/// Clones share the same tables. Rows are never removed by deleting a profile, plan or
/// exercise, they are only flagged as deleted and ignored by every read. Days and exercises of
/// a plan are removed when the plan is replaced.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    sequence: Arc<AtomicU64>,
}

#[derive(Default)]
struct Tables {
    exercises: Vec<Exercise>,
    profiles: Vec<Profile>,
    plans: Vec<Plan>,
    days: Vec<Day>,
    plan_exercises: Vec<PlanExercise>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_exercises(vec![])
    }

    /// Creates a store whose catalog contains `exercises` in the given order.
    #[must_use]
    pub fn with_exercises(exercises: impl IntoIterator<Item = domain::Exercise>) -> Self {
        let tables = Tables {
            exercises: exercises.into_iter().map(Exercise::from).collect(),
            ..Tables::default()
        };
        Self {
            tables: Arc::new(Mutex::new(tables)),
            sequence: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn delete_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::ExerciseID, domain::DeleteError> {
        let mut tables = self.lock()?;
        let exercise = tables
            .exercises
            .iter_mut()
            .find(|e| e.id == *id && !e.is_deleted)
            .ok_or(domain::DeleteError::NotFound)?;
        exercise.is_deleted = true;
        Ok(id)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, domain::StorageError> {
        self.tables
            .lock()
            .map_err(|err| domain::StorageError::Other(err.to_string().into()))
    }

    fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    fn active_exercises(&self) -> Result<Vec<domain::Exercise>, domain::StorageError> {
        Ok(self
            .lock()?
            .exercises
            .iter()
            .filter(|e| !e.is_deleted)
            .cloned()
            .map(domain::Exercise::from)
            .collect())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl domain::CatalogRepository for MemoryStore {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        Ok(self.active_exercises()?)
    }

    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        self.active_exercises()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(domain::ReadError::NotFound)
    }

    async fn read_exercises_by_ids(
        &self,
        ids: &[domain::ExerciseID],
    ) -> Result<BTreeMap<domain::ExerciseID, domain::Exercise>, domain::ReadError> {
        Ok(self
            .active_exercises()?
            .into_iter()
            .filter(|e| ids.contains(&e.id))
            .map(|e| (e.id, e))
            .collect())
    }

    async fn read_exercises_by_goal_and_equipment(
        &self,
        goal: &domain::Goal,
        equipment: &[String],
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        Ok(self
            .active_exercises()?
            .into_iter()
            .filter(|e| e.serves_goal(goal) && e.usable_with(equipment))
            .collect())
    }

    async fn read_exercises_by_body_parts_and_equipment(
        &self,
        body_parts: &[&str],
        equipment: &[String],
        exclude: &[domain::ExerciseID],
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        Ok(self
            .active_exercises()?
            .into_iter()
            .filter(|e| {
                e.targets_any(body_parts) && e.usable_with(equipment) && !exclude.contains(&e.id)
            })
            .collect())
    }
}

impl domain::ProfileRepository for MemoryStore {
    async fn read_profile(
        &self,
        user_id: domain::UserID,
    ) -> Result<domain::Profile, domain::ReadError> {
        let tables = self.lock()?;
        let profile = tables
            .profiles
            .iter()
            .find(|p| p.user_id == *user_id && !p.is_deleted)
            .cloned()
            .ok_or(domain::ReadError::NotFound)?;
        Ok(domain::Profile::try_from(profile)?)
    }

    async fn replace_profile(
        &self,
        profile: domain::Profile,
    ) -> Result<domain::Profile, domain::UpdateError> {
        let row = Profile::try_from(&profile)?;
        let mut tables = self.lock()?;
        match tables
            .profiles
            .iter()
            .position(|p| p.user_id == row.user_id && !p.is_deleted)
        {
            Some(index) => tables.profiles[index] = row.clone(),
            None => tables.profiles.push(row.clone()),
        }
        Ok(domain::Profile::try_from(row)?)
    }

    async fn delete_profile(
        &self,
        user_id: domain::UserID,
    ) -> Result<domain::UserID, domain::DeleteError> {
        let mut tables = self.lock()?;
        let profile = tables
            .profiles
            .iter_mut()
            .find(|p| p.user_id == *user_id && !p.is_deleted)
            .ok_or(domain::DeleteError::NotFound)?;
        profile.is_deleted = true;
        Ok(user_id)
    }
}

impl domain::PlanRepository for MemoryStore {
    type Transaction = MemoryTransaction;

    async fn read_active_plan(
        &self,
        user_id: domain::UserID,
    ) -> Result<domain::WorkoutPlan, domain::ReadError> {
        let tables = self.lock()?;
        let plan = tables
            .plans
            .iter()
            .rev()
            .find(|p| p.user_id == *user_id && !p.is_deleted)
            .ok_or(domain::ReadError::NotFound)?;
        Ok(tables.assemble_plan(plan)?)
    }

    async fn begin(&self) -> Result<MemoryTransaction, domain::StorageError> {
        Ok(MemoryTransaction {
            store: self.clone(),
            operations: vec![],
        })
    }

    async fn update_exercise_in_plan(
        &self,
        id: domain::PlanExerciseID,
        exercise_id: domain::ExerciseID,
    ) -> Result<domain::WorkoutPlanExercise, domain::UpdateError> {
        let mut tables = self.lock()?;
        let row = tables.plan_exercise_mut(id)?;
        row.exercise_id = *exercise_id;
        Ok(domain::WorkoutPlanExercise::from(row.clone()))
    }

    async fn update_reps(
        &self,
        id: domain::PlanExerciseID,
        reps: domain::Reps,
    ) -> Result<domain::WorkoutPlanExercise, domain::UpdateError> {
        let mut tables = self.lock()?;
        let row = tables.plan_exercise_mut(id)?;
        row.reps = *reps;
        Ok(domain::WorkoutPlanExercise::from(row.clone()))
    }

    async fn delete_active_plan(
        &self,
        user_id: domain::UserID,
    ) -> Result<domain::PlanID, domain::DeleteError> {
        let mut tables = self.lock()?;
        let mut deleted = None;
        for plan in tables
            .plans
            .iter_mut()
            .filter(|p| p.user_id == *user_id && !p.is_deleted)
        {
            plan.is_deleted = true;
            deleted = Some(plan.id.into());
        }
        deleted.ok_or(domain::DeleteError::NotFound)
    }
}

impl Tables {
    fn assemble_plan(&self, plan: &Plan) -> Result<domain::WorkoutPlan, domain::StorageError> {
        let mut days = self
            .days
            .iter()
            .filter(|d| d.plan_id == plan.id)
            .map(|day| {
                let mut exercises = self
                    .plan_exercises
                    .iter()
                    .filter(|e| e.day_id == day.id)
                    .cloned()
                    .map(domain::WorkoutPlanExercise::from)
                    .collect::<Vec<_>>();
                exercises.sort_by_key(|e| (e.order, e.id));
                Ok(domain::WorkoutPlanDay {
                    id: day.id.into(),
                    day_number: day.day_number,
                    focus: parse_focus(&day.focus)?,
                    exercises,
                })
            })
            .collect::<Result<Vec<_>, domain::StorageError>>()?;
        days.sort_by_key(|d| d.day_number);

        Ok(domain::WorkoutPlan {
            id: plan.id.into(),
            user_id: plan.user_id.into(),
            split_type: domain::SplitType::from(plan.split_type.as_str()),
            goal: domain::Goal::from(plan.goal.as_str()),
            created_at: plan.created_at,
            days,
        })
    }

    fn plan_exercise_mut(
        &mut self,
        id: domain::PlanExerciseID,
    ) -> Result<&mut PlanExercise, domain::UpdateError> {
        self.plan_exercises
            .iter_mut()
            .find(|e| e.id == *id)
            .ok_or(domain::UpdateError::NotFound)
    }

    fn apply(&mut self, operation: Operation) {
        match operation {
            Operation::DeleteActivePlans(user_id) => {
                let plan_ids = self
                    .plans
                    .iter_mut()
                    .filter(|p| p.user_id == user_id && !p.is_deleted)
                    .map(|p| {
                        p.is_deleted = true;
                        p.id
                    })
                    .collect::<Vec<_>>();
                let day_ids = self
                    .days
                    .iter()
                    .filter(|d| plan_ids.contains(&d.plan_id))
                    .map(|d| d.id)
                    .collect::<Vec<_>>();
                self.plan_exercises.retain(|e| !day_ids.contains(&e.day_id));
                self.days.retain(|d| !plan_ids.contains(&d.plan_id));
            }
            Operation::InsertPlan(plan) => self.plans.push(plan),
            Operation::InsertDay(day) => self.days.push(day),
            Operation::InsertPlanExercise(exercise) => self.plan_exercises.push(exercise),
        }
    }
}

fn parse_focus(value: &str) -> Result<domain::Focus, domain::StorageError> {
    value
        .parse()
        .map_err(|_| domain::StorageError::CorruptRecord(format!("unknown focus \"{value}\"")))
}

/// Staged writes of a plan.
///
/// Identifiers are allocated while staging, so later writes can refer to earlier ones. The
/// writes are applied under a single lock on commit.
pub struct MemoryTransaction {
    store: MemoryStore,
    operations: Vec<Operation>,
}

#[derive(Debug)]
enum Operation {
    DeleteActivePlans(u64),
    InsertPlan(Plan),
    InsertDay(Day),
    InsertPlanExercise(PlanExercise),
}

impl domain::PlanTransaction for MemoryTransaction {
    async fn delete_active_plans(
        &mut self,
        user_id: domain::UserID,
    ) -> Result<(), domain::StorageError> {
        self.operations.push(Operation::DeleteActivePlans(*user_id));
        Ok(())
    }

    async fn create_plan(
        &mut self,
        user_id: domain::UserID,
        split_type: &domain::SplitType,
        goal: &domain::Goal,
    ) -> Result<domain::PlanID, domain::StorageError> {
        let id = self.store.next_id();
        self.operations.push(Operation::InsertPlan(Plan {
            id,
            user_id: *user_id,
            split_type: split_type.to_string(),
            goal: goal.to_string(),
            created_at: Utc::now(),
            is_deleted: false,
        }));
        Ok(id.into())
    }

    async fn create_day(
        &mut self,
        plan_id: domain::PlanID,
        day_number: u32,
        focus: domain::Focus,
    ) -> Result<domain::DayID, domain::StorageError> {
        let id = self.store.next_id();
        self.operations.push(Operation::InsertDay(Day {
            id,
            plan_id: *plan_id,
            day_number,
            focus: focus.to_string(),
        }));
        Ok(id.into())
    }

    async fn create_plan_exercise(
        &mut self,
        day_id: domain::DayID,
        exercise: domain::NewPlanExercise,
    ) -> Result<domain::PlanExerciseID, domain::StorageError> {
        let id = self.store.next_id();
        self.operations
            .push(Operation::InsertPlanExercise(PlanExercise {
                id,
                day_id: *day_id,
                exercise_id: *exercise.exercise_id,
                order: exercise.order,
                reps: exercise.reps,
                sets: exercise.sets,
                note: exercise.note,
            }));
        Ok(id.into())
    }

    async fn commit(self) -> Result<(), domain::StorageError> {
        let mut tables = self.store.lock()?;
        debug!("applying {} staged writes", self.operations.len());
        for operation in self.operations {
            tables.apply(operation);
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), domain::StorageError> {
        debug!("discarding {} staged writes", self.operations.len());
        Ok(())
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: u64,
    pub name: String,
    pub body_part: String,
    pub difficulty: String,
    pub category: String,
    pub exercise_type: String,
    pub goal_tag: String,
    pub equipment: String,
    pub description: String,
    pub instructions: String,
    pub is_deleted: bool,
}

impl From<domain::Exercise> for Exercise {
    fn from(value: domain::Exercise) -> Self {
        Self {
            id: *value.id,
            name: value.name,
            body_part: value.body_part,
            difficulty: value
                .difficulty
                .map(|d| d.to_string())
                .unwrap_or_default(),
            category: value.category,
            exercise_type: value.exercise_type,
            goal_tag: value.goal_tag,
            equipment: value.equipment,
            description: value.description,
            instructions: value.instructions,
            is_deleted: false,
        }
    }
}

impl From<Exercise> for domain::Exercise {
    fn from(value: Exercise) -> Self {
        Self {
            id: value.id.into(),
            name: value.name,
            body_part: value.body_part,
            difficulty: value.difficulty.parse().ok(),
            category: value.category,
            exercise_type: value.exercise_type,
            goal_tag: value.goal_tag,
            equipment: value.equipment,
            description: value.description,
            instructions: value.instructions,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub user_id: u64,
    pub split_type: String,
    pub intensity: String,
    pub target_weight: f64,
    pub bmi: f64,
    pub bmi_category: String,
    pub frequency: u32,
    pub duration_per_session: u32,
    pub goal: String,
    pub equipment: String,
    pub rest_days: String,
    pub is_deleted: bool,
}

impl TryFrom<&domain::Profile> for Profile {
    type Error = domain::StorageError;

    fn try_from(value: &domain::Profile) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: *value.user_id,
            split_type: value.split_type.to_string(),
            intensity: value.intensity.to_string(),
            target_weight: value.target_weight,
            bmi: value.bmi,
            bmi_category: value
                .bmi_category
                .map(|c| c.to_string())
                .unwrap_or_default(),
            frequency: value.frequency,
            duration_per_session: value.duration_per_session,
            goal: value.goal.to_string(),
            equipment: domain::encode_list(&value.equipment)?,
            rest_days: domain::encode_list(&value.rest_days)?,
            is_deleted: false,
        })
    }
}

impl TryFrom<Profile> for domain::Profile {
    type Error = domain::StorageError;

    fn try_from(value: Profile) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: value.user_id.into(),
            split_type: domain::SplitType::from(value.split_type.as_str()),
            intensity: value.intensity.parse().map_err(|_| {
                domain::StorageError::CorruptRecord(format!(
                    "unknown intensity \"{}\"",
                    value.intensity
                ))
            })?,
            target_weight: value.target_weight,
            bmi: value.bmi,
            bmi_category: value.bmi_category.parse().ok(),
            frequency: value.frequency,
            duration_per_session: value.duration_per_session,
            goal: domain::Goal::from(value.goal.as_str()),
            equipment: domain::decode_list(&value.equipment)?,
            rest_days: domain::decode_list(&value.rest_days)?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Plan {
    pub id: u64,
    pub user_id: u64,
    pub split_type: String,
    pub goal: String,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub id: u64,
    pub plan_id: u64,
    pub day_number: u32,
    pub focus: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlanExercise {
    pub id: u64,
    pub day_id: u64,
    pub exercise_id: u64,
    pub order: u32,
    pub reps: u32,
    pub sets: u32,
    pub note: Option<String>,
}

impl From<PlanExercise> for domain::WorkoutPlanExercise {
    fn from(value: PlanExercise) -> Self {
        Self {
            id: value.id.into(),
            exercise_id: value.exercise_id.into(),
            order: value.order,
            reps: value.reps,
            sets: value.sets,
            note: value.note,
        }
    }
}
