use std::fmt;

use derive_more::{Deref, Display};
use strum::{AsRefStr, EnumString};

use crate::{DeleteError, ReadError, UpdateError, ValidationError};

/// Equipment names a profile may list.
pub const EQUIPMENT: [&str; 15] = [
    "Body Only",
    "Bands",
    "Barbell",
    "Cable",
    "Cables",
    "Dumbbell",
    "Dumbbells",
    "E-Z Curl Bar",
    "Exercise Ball",
    "Kettlebells",
    "Machine",
    "Medicine Ball",
    "Weight Bench",
    "None",
    "Other",
];

pub const BODY_ONLY: &str = "Body Only";

#[allow(async_fn_in_trait)]
pub trait ProfileService {
    async fn get_profile(&self, user_id: UserID) -> Result<Profile, ReadError>;
    async fn replace_profile(&self, profile: Profile) -> Result<Profile, UpdateError>;
    async fn delete_profile(&self, user_id: UserID) -> Result<UserID, DeleteError>;

    /// Checks every item against the known equipment and makes sure body weight exercises stay
    /// available.
    fn validate_equipment(&self, equipment: &[String]) -> Result<Vec<String>, ValidationError> {
        let mut result = Vec::with_capacity(equipment.len() + 1);
        for item in equipment {
            let Some(known) = EQUIPMENT
                .iter()
                .find(|e| e.eq_ignore_ascii_case(item.trim()))
            else {
                return Err(ValidationError::Invalid(format!("equipment \"{item}\"")));
            };
            if !result.iter().any(|r: &String| r.as_str() == *known) {
                result.push((*known).to_string());
            }
        }
        if !result.iter().any(|e| e == BODY_ONLY) {
            result.push(BODY_ONLY.to_string());
        }
        Ok(result)
    }

    fn validate_split_type(&self, split_type: &str) -> Result<SplitType, ValidationError> {
        match SplitType::from(split_type) {
            SplitType::Custom(_) => Err(ValidationError::Invalid("split type".to_string())),
            split_type => Ok(split_type),
        }
    }

    fn validate_goal(&self, goal: &str) -> Result<Goal, ValidationError> {
        match Goal::from(goal) {
            Goal::Other(_) => Err(ValidationError::Invalid("goal".to_string())),
            goal => Ok(goal),
        }
    }

    fn validate_profile(&self, profile: Profile) -> Result<Profile, ValidationError> {
        if profile.frequency == 0 {
            return Err(ValidationError::Invalid("frequency".to_string()));
        }
        if profile.duration_per_session == 0 {
            return Err(ValidationError::Invalid("duration per session".to_string()));
        }
        if profile.target_weight <= 0.0 {
            return Err(ValidationError::Invalid("target weight".to_string()));
        }
        let split_type = self.validate_split_type(profile.split_type.as_str())?;
        let goal = self.validate_goal(profile.goal.as_str())?;
        let equipment = self.validate_equipment(&profile.equipment)?;
        Ok(Profile {
            split_type,
            goal,
            equipment,
            ..profile
        })
    }
}

#[allow(async_fn_in_trait)]
pub trait ProfileRepository {
    async fn read_profile(&self, user_id: UserID) -> Result<Profile, ReadError>;
    async fn replace_profile(&self, profile: Profile) -> Result<Profile, UpdateError>;
    async fn delete_profile(&self, user_id: UserID) -> Result<UserID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user_id: UserID,
    pub split_type: SplitType,
    pub intensity: Intensity,
    pub target_weight: f64,
    pub bmi: f64,
    pub bmi_category: Option<BmiCategory>,
    pub frequency: u32,
    pub duration_per_session: u32,
    pub goal: Goal,
    pub equipment: Vec<String>,
    pub rest_days: Vec<u32>,
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(u64);

impl UserID {
    #[must_use]
    pub fn nil() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for UserID {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(AsRefStr, Display, EnumString, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[strum(ascii_case_insensitive)]
pub enum Intensity {
    Beginner,
    Intermediate,
    Advanced,
}

impl Intensity {
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Intensity::Beginner => 1,
            Intensity::Intermediate => 2,
            Intensity::Advanced => 3,
        }
    }
}

#[derive(AsRefStr, Display, EnumString, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Goal {
    MuscleGain,
    FatLoss,
    Stamina,
    GeneralFitness,
    Other(String),
}

impl Goal {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Goal::MuscleGain => "Muscle Gain",
            Goal::FatLoss => "Fat Loss",
            Goal::Stamina => "Stamina",
            Goal::GeneralFitness => "General Fitness",
            Goal::Other(goal) => goal,
        }
    }
}

impl From<&str> for Goal {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "muscle gain" => Goal::MuscleGain,
            "fat loss" => Goal::FatLoss,
            "stamina" => Goal::Stamina,
            "general fitness" | "general fit" => Goal::GeneralFitness,
            _ => Goal::Other(value.trim().to_string()),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitType {
    PushPullLegs,
    UpperLower,
    FullBody,
    BroSplit,
    Custom(String),
}

impl SplitType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SplitType::PushPullLegs => "Push/Pull/Legs",
            SplitType::UpperLower => "Upper/Lower",
            SplitType::FullBody => "Full Body",
            SplitType::BroSplit => "Bro Split",
            SplitType::Custom(split_type) => split_type,
        }
    }
}

impl From<&str> for SplitType {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "push/pull/legs" => SplitType::PushPullLegs,
            "upper/lower" => SplitType::UpperLower,
            "full body" => SplitType::FullBody,
            "bro split" => SplitType::BroSplit,
            _ => SplitType::Custom(value.trim().to_string()),
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
