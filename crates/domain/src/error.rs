use crate::{ExerciseID, Focus, ScheduleError};

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<ReadError> for UpdateError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => UpdateError::NotFound,
            ReadError::Storage(storage) => UpdateError::Storage(storage),
            ReadError::Other(other) => UpdateError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("invalid {0}")]
    Invalid(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

/// Failures of the plan generation, mutation and read operations.
///
/// Everything except `Storage` and `Other` is a domain outcome the caller is expected to map to
/// a user-facing status. `Storage` signals that a collaborator could not be reached or returned
/// unusable data.
#[derive(thiserror::Error, Debug)]
pub enum PlanError {
    #[error("profile not found")]
    ProfileNotFound,
    #[error("invalid schedule configuration: {0}")]
    InvalidScheduleConfig(#[from] ScheduleError),
    #[error("no exercises match the profile")]
    NoMatchingExercises,
    #[error("no suitable exercises found for focus {0}")]
    NoSuitableExercises(Focus),
    #[error("exercise not found in plan")]
    ExerciseNotInPlan,
    #[error("exercise {0} not found")]
    ExerciseNotFound(ExerciseID),
    #[error("no active workout plan")]
    PlanNotFound,
    #[error("day {0} not found in plan")]
    DayNotFound(u32),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl PlanError {
    pub(crate) fn from_profile_read(value: ReadError) -> Self {
        Self::from_read(value, PlanError::ProfileNotFound)
    }

    pub(crate) fn from_plan_read(value: ReadError) -> Self {
        Self::from_read(value, PlanError::PlanNotFound)
    }

    pub(crate) fn from_exercise_read(value: ReadError, id: ExerciseID) -> Self {
        Self::from_read(value, PlanError::ExerciseNotFound(id))
    }

    /// List queries only fail on infrastructure errors, an empty result is not an error.
    pub(crate) fn from_catalog_read(value: ReadError) -> Self {
        Self::from_read(value, PlanError::NoMatchingExercises)
    }

    fn from_read(value: ReadError, not_found: PlanError) -> Self {
        match value {
            ReadError::NotFound => not_found,
            ReadError::Storage(storage) => PlanError::Storage(storage),
            ReadError::Other(other) => PlanError::Other(other),
        }
    }

    pub(crate) fn from_update(value: UpdateError) -> Self {
        match value {
            UpdateError::NotFound => PlanError::ExerciseNotInPlan,
            UpdateError::Storage(storage) => PlanError::Storage(storage),
            UpdateError::Other(other) => PlanError::Other(other),
        }
    }

    pub(crate) fn from_delete(value: DeleteError) -> Self {
        match value {
            DeleteError::NotFound => PlanError::PlanNotFound,
            DeleteError::Storage(storage) => PlanError::Storage(storage),
            DeleteError::Other(other) => PlanError::Other(other),
        }
    }
}
