use std::collections::BTreeSet;

use strum::{AsRefStr, Display, EnumString};

use crate::SplitType;

pub const DAYS_PER_WEEK: u32 = 7;

const FULL_BODY: &[&str] = &[
    "Chest",
    "Back",
    "Quadriceps",
    "Hamstrings",
    "Calves",
    "Shoulders",
    "Biceps",
    "Triceps",
    "Forearms",
    "Glutes",
    "Abdominals",
];

/// The body part group trained on a day.
#[derive(AsRefStr, Display, EnumString, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(ascii_case_insensitive)]
pub enum Focus {
    Push,
    Pull,
    Legs,
    Upper,
    Lower,
    #[strum(serialize = "Full Body")]
    FullBody,
    Chest,
    Back,
    Shoulders,
    Arms,
    General,
    Rest,
}

impl Focus {
    #[must_use]
    pub fn body_parts(self) -> &'static [&'static str] {
        match self {
            Focus::Push => &["Chest", "Shoulders", "Triceps"],
            Focus::Pull => &["Back", "Lats", "Biceps", "Forearms"],
            Focus::Legs => &["Quadriceps", "Glutes", "Hamstrings", "Calves", "Lower Back"],
            Focus::Upper => &["Chest", "Back", "Shoulders", "Biceps", "Triceps", "Forearms"],
            Focus::Lower => &["Quadriceps", "Hamstrings", "Glutes", "Calves", "Lower Back"],
            Focus::FullBody | Focus::General => FULL_BODY,
            Focus::Chest => &["Chest"],
            Focus::Back => &["Back", "Lats"],
            Focus::Shoulders => &["Shoulders"],
            Focus::Arms => &["Biceps", "Triceps", "Forearms"],
            Focus::Rest => &[],
        }
    }

    #[must_use]
    pub fn is_rest(self) -> bool {
        self == Focus::Rest
    }
}

impl SplitType {
    #[must_use]
    pub fn focus_pattern(&self) -> &'static [Focus] {
        match self {
            SplitType::PushPullLegs => &[Focus::Push, Focus::Pull, Focus::Legs],
            SplitType::UpperLower => &[Focus::Upper, Focus::Lower],
            SplitType::FullBody => &[Focus::FullBody],
            SplitType::BroSplit => &[
                Focus::Chest,
                Focus::Back,
                Focus::Legs,
                Focus::Shoulders,
                Focus::Arms,
            ],
            SplitType::Custom(_) => &[Focus::General],
        }
    }

    /// The focus pattern cycled or truncated to `frequency` entries.
    #[must_use]
    pub fn focus_sequence(&self, frequency: u32) -> Vec<Focus> {
        self.focus_pattern()
            .iter()
            .copied()
            .cycle()
            .take(frequency as usize)
            .collect()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid number of rest days ({0} > 7)")]
    TooManyRestDays(usize),
    #[error("invalid rest day {0} (must be between 1 and 7)")]
    InvalidRestDay(u32),
    #[error(
        "not enough workout days: {rest_days} rest days leave only {available} workout days, but frequency is set to {frequency}"
    )]
    NotEnoughTrainingDays {
        rest_days: usize,
        available: u32,
        frequency: u32,
    },
    #[error("push/pull/legs split is based on a 3-day cycle; valid frequencies are 3 or 6 (got {0})")]
    PushPullLegsFrequency(u32),
    #[error("upper/lower split is based on a 2-day cycle; valid frequencies are 2, 4 or 6 (got {0})")]
    UpperLowerFrequency(u32),
    #[error("bro split requires exactly 5 workout days (got {0})")]
    BroSplitFrequency(u32),
    #[error("full body split requires between 2 and 4 sessions per week (got {0})")]
    FullBodyFrequency(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySlot {
    Rest,
    Training(Focus),
    /// A non-rest day left over after the focus sequence ran out.
    Unassigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledDay {
    pub day_number: u32,
    pub slot: DaySlot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub days: Vec<ScheduledDay>,
}

impl Schedule {
    pub fn training_days(&self) -> impl Iterator<Item = (u32, Focus)> + '_ {
        self.days.iter().filter_map(|d| match d.slot {
            DaySlot::Training(focus) => Some((d.day_number, focus)),
            DaySlot::Rest | DaySlot::Unassigned => None,
        })
    }

    pub fn rest_days(&self) -> impl Iterator<Item = u32> + '_ {
        self.days
            .iter()
            .filter(|d| d.slot == DaySlot::Rest)
            .map(|d| d.day_number)
    }
}

pub fn validate_schedule(
    split_type: &SplitType,
    frequency: u32,
    rest_days: &[u32],
) -> Result<(), ScheduleError> {
    let rest_days = rest_days.iter().copied().collect::<BTreeSet<_>>();

    if rest_days.len() > DAYS_PER_WEEK as usize {
        return Err(ScheduleError::TooManyRestDays(rest_days.len()));
    }

    if let Some(day) = rest_days.iter().find(|d| !(1..=DAYS_PER_WEEK).contains(*d)) {
        return Err(ScheduleError::InvalidRestDay(*day));
    }

    #[allow(clippy::cast_possible_truncation)]
    let available = DAYS_PER_WEEK - rest_days.len() as u32;
    if available < frequency {
        return Err(ScheduleError::NotEnoughTrainingDays {
            rest_days: rest_days.len(),
            available,
            frequency,
        });
    }

    match split_type {
        SplitType::PushPullLegs if frequency < 3 || frequency % 3 != 0 => {
            Err(ScheduleError::PushPullLegsFrequency(frequency))
        }
        SplitType::UpperLower if frequency < 2 || frequency % 2 != 0 => {
            Err(ScheduleError::UpperLowerFrequency(frequency))
        }
        SplitType::BroSplit if frequency != 5 => Err(ScheduleError::BroSplitFrequency(frequency)),
        SplitType::FullBody if !(2..=4).contains(&frequency) => {
            Err(ScheduleError::FullBodyFrequency(frequency))
        }
        _ => Ok(()),
    }
}

/// Lays out the week after validating the configuration.
///
/// Focuses are assigned in order to the non-rest days starting from day 1. Non-rest days that
/// remain after the focus sequence is used up stay [`DaySlot::Unassigned`].
pub fn build_schedule(
    split_type: &SplitType,
    frequency: u32,
    rest_days: &[u32],
) -> Result<Schedule, ScheduleError> {
    validate_schedule(split_type, frequency, rest_days)?;

    let mut focuses = split_type.focus_sequence(frequency).into_iter();
    let days = (1..=DAYS_PER_WEEK)
        .map(|day_number| ScheduledDay {
            day_number,
            slot: if rest_days.contains(&day_number) {
                DaySlot::Rest
            } else {
                focuses.next().map_or(DaySlot::Unassigned, DaySlot::Training)
            },
        })
        .collect();

    Ok(Schedule { days })
}
