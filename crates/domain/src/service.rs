use std::collections::BTreeMap;

use log::{debug, error, info, warn};

use crate::{
    Alternative, CatalogRepository, Criteria, DayOverview, DayWorkout, DaySlot, DeleteError,
    Exercise, ExerciseID, ExerciseService, Focus, NewPlanExercise, PlanError, PlanExerciseID,
    PlanID, PlanOverview, PlanRepository, PlanService, PlanTransaction, PlannedExercise, Profile,
    ProfileRepository, ProfileService, ReadError, Replacement, Reps, Schedule, Settings,
    UpdateError, UserID, WorkoutPlan, WorkoutPlanDay, WorkoutPlanExercise, body_part_scan,
    build_schedule, day_calories, determine_reps, filter_by_focus, metrics, select_exercises,
};

pub struct Service<R> {
    repository: R,
    settings: Settings,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self::with_settings(repository, Settings::default())
    }

    pub fn with_settings(repository: R, settings: Settings) -> Self {
        Self {
            repository,
            settings,
        }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                $error::Storage(_) | $error::Other(_) => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: CatalogRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        log_on_error!(
            self.repository.read_exercise(id),
            ReadError,
            "get",
            "exercise"
        )
    }
}

impl<R: ProfileRepository> ProfileService for Service<R> {
    async fn get_profile(&self, user_id: UserID) -> Result<Profile, ReadError> {
        log_on_error!(
            self.repository.read_profile(user_id),
            ReadError,
            "get",
            "profile"
        )
    }

    async fn replace_profile(&self, profile: Profile) -> Result<Profile, UpdateError> {
        let profile = self.validate_profile(profile).map_err(|err| {
            debug!("rejected profile: {err}");
            UpdateError::Other(err.into())
        })?;
        log_on_error!(
            self.repository.replace_profile(profile),
            UpdateError,
            "replace",
            "profile"
        )
    }

    async fn delete_profile(&self, user_id: UserID) -> Result<UserID, DeleteError> {
        log_on_error!(
            self.repository.delete_profile(user_id),
            DeleteError,
            "delete",
            "profile"
        )
    }
}

impl<R> PlanService for Service<R>
where
    R: CatalogRepository + ProfileRepository + PlanRepository,
{
    async fn generate_plan(&self, user_id: UserID) -> Result<WorkoutPlan, PlanError> {
        log_on_error!(self.generate(user_id), PlanError, "generate", "plan")
    }

    async fn get_plan(&self, user_id: UserID) -> Result<PlanOverview, PlanError> {
        log_on_error!(self.overview(user_id), PlanError, "get", "plan")
    }

    async fn delete_plan(&self, user_id: UserID) -> Result<PlanID, PlanError> {
        log_on_error!(
            async {
                self.repository
                    .delete_active_plan(user_id)
                    .await
                    .map_err(PlanError::from_delete)
            },
            PlanError,
            "delete",
            "plan"
        )
    }

    async fn get_workout_for_day(
        &self,
        user_id: UserID,
        day_number: u32,
    ) -> Result<DayWorkout, PlanError> {
        log_on_error!(
            self.day_workout(user_id, day_number),
            PlanError,
            "get",
            "workout"
        )
    }

    async fn replace_exercise(
        &self,
        user_id: UserID,
        original: ExerciseID,
        new: ExerciseID,
    ) -> Result<WorkoutPlanExercise, PlanError> {
        log_on_error!(
            self.replace(user_id, original, new),
            PlanError,
            "replace",
            "exercise"
        )
    }

    async fn edit_reps(
        &self,
        user_id: UserID,
        plan_exercise_id: PlanExerciseID,
        reps: Reps,
    ) -> Result<WorkoutPlanExercise, PlanError> {
        log_on_error!(
            self.change_reps(user_id, plan_exercise_id, reps),
            PlanError,
            "edit",
            "reps"
        )
    }

    async fn get_recommended_replacements(
        &self,
        user_id: UserID,
    ) -> Result<Vec<Replacement>, PlanError> {
        log_on_error!(
            self.recommend(user_id),
            PlanError,
            "get",
            "replacements"
        )
    }
}

impl<R> Service<R>
where
    R: CatalogRepository + ProfileRepository + PlanRepository,
{
    async fn generate(&self, user_id: UserID) -> Result<WorkoutPlan, PlanError> {
        let profile = self.profile(user_id).await?;
        let schedule = build_schedule(&profile.split_type, profile.frequency, &profile.rest_days)?;
        let candidates = self
            .repository
            .read_exercises_by_goal_and_equipment(&profile.goal, &profile.equipment)
            .await
            .map_err(PlanError::from_catalog_read)?;

        if candidates.is_empty() {
            return Err(PlanError::NoMatchingExercises);
        }

        let mut transaction = self.repository.begin().await?;
        match self
            .write_plan(&mut transaction, &profile, &schedule, &candidates)
            .await
        {
            Ok(plan_id) => {
                transaction.commit().await?;
                info!(
                    "generated plan {plan_id} for user {user_id} ({}, {})",
                    profile.split_type, profile.goal
                );
            }
            Err(err) => {
                if let Err(rollback_err) = transaction.rollback().await {
                    error!("failed to roll back plan of user {user_id}: {rollback_err}");
                }
                return Err(err);
            }
        }

        self.active_plan(user_id).await
    }

    async fn write_plan<T: PlanTransaction>(
        &self,
        transaction: &mut T,
        profile: &Profile,
        schedule: &Schedule,
        candidates: &[Exercise],
    ) -> Result<PlanID, PlanError> {
        let criteria = Criteria {
            goal: &profile.goal,
            intensity: profile.intensity,
        };
        let reps = determine_reps(profile.intensity, &profile.goal, profile.bmi_category);

        transaction.delete_active_plans(profile.user_id).await?;
        let plan_id = transaction
            .create_plan(profile.user_id, &profile.split_type, &profile.goal)
            .await?;

        for day in &schedule.days {
            match day.slot {
                DaySlot::Rest => {
                    let day_id = transaction
                        .create_day(plan_id, day.day_number, Focus::Rest)
                        .await?;
                    transaction
                        .create_plan_exercise(day_id, NewPlanExercise::rest())
                        .await?;
                }
                DaySlot::Training(focus) => {
                    let exercises = self.pick_exercises(candidates, criteria, focus)?;
                    let day_id = transaction
                        .create_day(plan_id, day.day_number, focus)
                        .await?;
                    for (order, exercise) in (1..).zip(exercises) {
                        transaction
                            .create_plan_exercise(
                                day_id,
                                NewPlanExercise {
                                    exercise_id: exercise.id,
                                    order,
                                    reps,
                                    sets: self.settings.sets_per_exercise,
                                    note: None,
                                },
                            )
                            .await?;
                    }
                }
                DaySlot::Unassigned => {
                    debug!("day {} has no focus assigned", day.day_number);
                }
            }
        }

        Ok(plan_id)
    }

    fn pick_exercises(
        &self,
        candidates: &[Exercise],
        criteria: Criteria,
        focus: Focus,
    ) -> Result<Vec<Exercise>, PlanError> {
        let focused = filter_by_focus(candidates, focus);
        let pool = if focused.is_empty() {
            candidates
        } else {
            focused.as_slice()
        };

        let selection = select_exercises(pool, criteria, focus, self.settings.exercises_per_day);
        if !selection.is_empty() {
            debug!(
                "selected {} exercises for {focus} at tier {:?}",
                selection.exercises.len(),
                selection.tier
            );
            return Ok(selection.exercises);
        }

        let scanned = body_part_scan(pool, focus, self.settings.exercises_per_day);
        if scanned.is_empty() {
            return Err(PlanError::NoSuitableExercises(focus));
        }
        Ok(scanned)
    }

    async fn overview(&self, user_id: UserID) -> Result<PlanOverview, PlanError> {
        let profile = self.profile(user_id).await?;
        let plan = self.active_plan(user_id).await?;
        let catalog = self.catalog_entries(&plan).await?;

        Ok(PlanOverview {
            plan_id: plan.id,
            split_type: plan.split_type.clone(),
            goal: plan.goal.clone(),
            created_at: plan.created_at,
            days: plan
                .days
                .iter()
                .map(|day| day_overview(day, &catalog))
                .collect(),
            bmi: metrics::bmi_info(&profile),
            calories: metrics::calories_burned(&profile),
            nutrition: metrics::nutrition_target(&profile),
            training_advice: metrics::training_advice(&profile.goal),
        })
    }

    async fn day_workout(&self, user_id: UserID, day_number: u32) -> Result<DayWorkout, PlanError> {
        let profile = self.profile(user_id).await?;
        let plan = self.active_plan(user_id).await?;
        let day = plan
            .day(day_number)
            .ok_or(PlanError::DayNotFound(day_number))?;
        let catalog = self.catalog_entries(&plan).await?;
        let day = day_overview(day, &catalog);
        let calories_burned = day_calories(
            day.exercises
                .iter()
                .filter(|e| !e.is_rest())
                .map(|e| e.goal_tag.as_str()),
            profile.target_weight,
        );

        Ok(DayWorkout {
            day,
            calories_burned,
        })
    }

    async fn replace(
        &self,
        user_id: UserID,
        original: ExerciseID,
        new: ExerciseID,
    ) -> Result<WorkoutPlanExercise, PlanError> {
        let plan = self.active_plan(user_id).await?;
        let row = plan
            .exercises()
            .find(|e| !e.is_rest() && e.exercise_id == original)
            .ok_or(PlanError::ExerciseNotInPlan)?;
        self.repository
            .read_exercise(new)
            .await
            .map_err(|err| PlanError::from_exercise_read(err, new))?;

        let updated = self
            .repository
            .update_exercise_in_plan(row.id, new)
            .await
            .map_err(PlanError::from_update)?;
        info!("replaced exercise {original} by {new} in plan {}", plan.id);
        Ok(updated)
    }

    async fn change_reps(
        &self,
        user_id: UserID,
        plan_exercise_id: PlanExerciseID,
        reps: Reps,
    ) -> Result<WorkoutPlanExercise, PlanError> {
        let plan = self.active_plan(user_id).await?;
        let row = plan
            .exercises()
            .find(|e| !e.is_rest() && e.id == plan_exercise_id)
            .ok_or(PlanError::ExerciseNotInPlan)?;

        self.repository
            .update_reps(row.id, reps)
            .await
            .map_err(PlanError::from_update)
    }

    async fn recommend(&self, user_id: UserID) -> Result<Vec<Replacement>, PlanError> {
        let profile = self.profile(user_id).await?;
        let plan = self.active_plan(user_id).await?;
        let catalog = self.catalog_entries(&plan).await?;
        let plan_exercise_ids = plan.exercise_ids();

        let mut replacements = vec![];
        for row in plan.exercises().filter(|e| !e.is_rest()) {
            let Some(exercise) = catalog.get(&row.exercise_id) else {
                warn!("exercise {} of plan {} not in catalog", row.exercise_id, plan.id);
                continue;
            };
            let alternatives = self
                .repository
                .read_exercises_by_body_parts_and_equipment(
                    &[exercise.body_part.as_str()],
                    &profile.equipment,
                    &plan_exercise_ids,
                )
                .await
                .map_err(PlanError::from_catalog_read)?;

            replacements.push(Replacement {
                plan_exercise_id: row.id,
                original_exercise_id: row.exercise_id,
                name: exercise.name.clone(),
                alternatives: alternatives
                    .into_iter()
                    .take(self.settings.max_replacements)
                    .map(|e| Alternative {
                        exercise_id: e.id,
                        name: e.name,
                        description: e.description,
                    })
                    .collect(),
            });
        }

        Ok(replacements)
    }

    async fn profile(&self, user_id: UserID) -> Result<Profile, PlanError> {
        self.repository
            .read_profile(user_id)
            .await
            .map_err(PlanError::from_profile_read)
    }

    async fn active_plan(&self, user_id: UserID) -> Result<WorkoutPlan, PlanError> {
        self.repository
            .read_active_plan(user_id)
            .await
            .map_err(PlanError::from_plan_read)
    }

    async fn catalog_entries(
        &self,
        plan: &WorkoutPlan,
    ) -> Result<BTreeMap<ExerciseID, Exercise>, PlanError> {
        self.repository
            .read_exercises_by_ids(&plan.exercise_ids())
            .await
            .map_err(PlanError::from_catalog_read)
    }
}

fn day_overview(day: &WorkoutPlanDay, catalog: &BTreeMap<ExerciseID, Exercise>) -> DayOverview {
    DayOverview {
        id: day.id,
        day_number: day.day_number,
        focus: day.focus,
        exercises: day
            .exercises
            .iter()
            .filter_map(|row| {
                if row.is_rest() {
                    return Some(PlannedExercise::rest(row));
                }
                let Some(exercise) = catalog.get(&row.exercise_id) else {
                    warn!("skipping exercise {} missing from catalog", row.exercise_id);
                    return None;
                };
                Some(PlannedExercise {
                    plan_exercise_id: row.id,
                    exercise_id: row.exercise_id,
                    name: exercise.name.clone(),
                    body_part: exercise.body_part.clone(),
                    equipment: exercise.equipment.clone(),
                    goal_tag: exercise.goal_tag.clone(),
                    order: row.order,
                    reps: row.reps,
                    sets: row.sets,
                    note: row.note.clone(),
                })
            })
            .collect(),
    }
}
