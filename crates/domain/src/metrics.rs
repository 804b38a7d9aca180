use crate::{BmiCategory, Goal, Intensity, Profile};

const CALORIES_PER_MINUTE: f64 = 5.0;
const PROJECTION_WEEKS: f64 = 4.0;
const PROTEIN_PER_KG: f64 = 1.8;

#[derive(Debug, Clone, PartialEq)]
pub struct BmiInfo {
    pub value: f64,
    pub category: Option<BmiCategory>,
    pub advice: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaloriesBurned {
    pub per_session: f64,
    pub weekly: f64,
    /// Projection over four weeks.
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutritionTarget {
    pub calories: u32,
    pub protein: f64,
}

#[must_use]
pub fn bmi_advice(category: Option<BmiCategory>) -> &'static str {
    match category {
        Some(BmiCategory::Underweight) => "Focus on strength and calorie surplus.",
        Some(BmiCategory::Normal) => "Maintain balance across strength and cardio.",
        Some(BmiCategory::Overweight) => "Prioritize fat burning and cardio routines.",
        Some(BmiCategory::Obese) => "Low-impact, high-frequency cardio is recommended.",
        None => "",
    }
}

#[must_use]
pub fn bmi_info(profile: &Profile) -> BmiInfo {
    BmiInfo {
        value: profile.bmi,
        category: profile.bmi_category,
        advice: bmi_advice(profile.bmi_category),
    }
}

#[must_use]
pub fn calories_burned(profile: &Profile) -> CaloriesBurned {
    let per_session = f64::from(profile.duration_per_session) * CALORIES_PER_MINUTE;
    let weekly = per_session * f64::from(profile.frequency);
    CaloriesBurned {
        per_session,
        weekly,
        total: weekly * PROJECTION_WEEKS,
    }
}

#[must_use]
pub fn nutrition_target(profile: &Profile) -> NutritionTarget {
    let activity_multiplier = match profile.intensity {
        Intensity::Beginner => 1.3,
        Intensity::Intermediate => 1.5,
        Intensity::Advanced => 1.7,
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    NutritionTarget {
        calories: (24.0 * profile.target_weight * activity_multiplier) as u32,
        protein: profile.target_weight * PROTEIN_PER_KG,
    }
}

#[must_use]
pub fn training_advice(goal: &Goal) -> &'static str {
    match goal {
        Goal::MuscleGain => {
            "Use moderate to heavy resistance, 8–12 reps per set, with progressive overload. Focus on compound lifts and allow adequate rest between sets (60–90 seconds)."
        }
        Goal::FatLoss => {
            "Use moderate resistance with high volume (12–15 reps), short rest intervals (30–45 seconds), and prioritize supersets or circuits to maximize calorie burn."
        }
        Goal::Stamina => {
            "Train with lighter weights and high reps (15–20+), minimal rest, and maintain steady tempo to build muscular endurance."
        }
        Goal::GeneralFitness | Goal::Other(_) => {
            "Balance strength and endurance training. Focus on proper form and consistent weekly routines."
        }
    }
}

/// MET value for an exercise goal tag.
#[must_use]
pub fn met_value(goal_tag: &str) -> f64 {
    match goal_tag {
        "Strength" => 4.5,
        "Fat Loss" => 6.0,
        "General Fitness" => 5.0,
        "Stamina" => 7.0,
        _ => 4.0,
    }
}

/// Rough estimate counting one hour of activity per exercise.
#[must_use]
pub fn day_calories<'a>(goal_tags: impl IntoIterator<Item = &'a str>, body_weight: f64) -> f64 {
    goal_tags
        .into_iter()
        .map(|tag| met_value(tag) * body_weight)
        .sum()
}

/// Reps per set for generated exercises.
#[must_use]
pub fn determine_reps(intensity: Intensity, goal: &Goal, bmi_category: Option<BmiCategory>) -> u32 {
    match goal {
        Goal::MuscleGain => match intensity {
            Intensity::Beginner => 10,
            Intensity::Intermediate => 8,
            Intensity::Advanced => 6,
        },
        Goal::FatLoss => match bmi_category {
            Some(BmiCategory::Overweight | BmiCategory::Obese) => 15,
            _ => 12,
        },
        Goal::Stamina => 15,
        Goal::GeneralFitness => {
            if intensity == Intensity::Beginner || bmi_category == Some(BmiCategory::Underweight) {
                12
            } else {
                10
            }
        }
        Goal::Other(_) => 10,
    }
}
