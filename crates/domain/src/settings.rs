#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Upper bound of exercises selected for each training day.
    pub exercises_per_day: usize,
    pub sets_per_exercise: u32,
    /// Upper bound of alternatives suggested for each plan exercise.
    pub max_replacements: usize,
}

impl Settings {
    /// Settings must be given as a JSON object, missing keys take their default value.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(SettingsError::NotAnObject);
        }
        let settings: Settings = serde_json::from_value(value)?;
        if settings.exercises_per_day == 0 {
            return Err(SettingsError::Invalid("exercises_per_day"));
        }
        if settings.sets_per_exercise == 0 {
            return Err(SettingsError::Invalid("sets_per_exercise"));
        }
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exercises_per_day: 4,
            sets_per_exercise: 3,
            max_replacements: 3,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("settings must be a JSON object")]
    NotAnObject,
    #[error("invalid value of {0}")]
    Invalid(&'static str),
}
