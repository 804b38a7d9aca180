#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod codec;
mod error;
mod exercise;
pub mod metrics;
mod plan;
mod profile;
mod schedule;
mod selection;
mod service;
mod settings;

pub use codec::{decode_list, encode_list};
pub use error::{DeleteError, PlanError, ReadError, StorageError, UpdateError, ValidationError};
pub use exercise::{
    CatalogRepository, Exercise, ExerciseID, ExerciseService, GENERAL_FITNESS_TAG,
};
pub use metrics::{
    BmiInfo, CaloriesBurned, NutritionTarget, day_calories, determine_reps,
};
pub use plan::{
    Alternative, DayID, DayOverview, DayWorkout, NewPlanExercise, PlanExerciseID, PlanID,
    PlanOverview, PlanRepository, PlanService, PlanTransaction, PlannedExercise, REST_DAY_NAME,
    Replacement, Reps, RepsError, WorkoutPlan, WorkoutPlanDay, WorkoutPlanExercise,
};
pub use profile::{
    BODY_ONLY, BmiCategory, EQUIPMENT, Goal, Intensity, Profile, ProfileRepository,
    ProfileService, SplitType, UserID,
};
pub use schedule::{
    DAYS_PER_WEEK, DaySlot, Focus, Schedule, ScheduleError, ScheduledDay, build_schedule,
    validate_schedule,
};
pub use selection::{
    Criteria, Selection, Tier, body_part_scan, filter_by_focus, select_exercises,
};
pub use service::Service;
pub use settings::{Settings, SettingsError};
