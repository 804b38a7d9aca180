use assert_approx_eq::assert_approx_eq;
use chrono::{Datelike, Local};
use pretty_assertions::assert_eq;
use rstest::rstest;
use wellplan_domain::{
    self as domain, ExerciseService, PlanRepository, PlanService, ProfileService, Service,
};

use crate::MemoryStore;
use crate::tests::data::{EXERCISES, PROFILE, PROFILE_2};

async fn setup(profiles: &[&domain::Profile]) -> (MemoryStore, Service<MemoryStore>) {
    setup_with_settings(profiles, domain::Settings::default()).await
}

async fn setup_with_settings(
    profiles: &[&domain::Profile],
    settings: domain::Settings,
) -> (MemoryStore, Service<MemoryStore>) {
    let store = MemoryStore::with_exercises(EXERCISES.clone());
    let service = Service::with_settings(store.clone(), settings);
    for profile in profiles {
        service.replace_profile((*profile).clone()).await.unwrap();
    }
    (store, service)
}

fn layout(plan: &domain::WorkoutPlan) -> Vec<(u32, domain::Focus, Vec<u64>)> {
    plan.days
        .iter()
        .map(|d| {
            (
                d.day_number,
                d.focus,
                d.exercises.iter().map(|e| *e.exercise_id).collect(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_generate_plan() {
    let (_, service) = setup(&[&*PROFILE]).await;

    let plan = service.generate_plan(PROFILE.user_id).await.unwrap();

    assert_eq!(plan.user_id, PROFILE.user_id);
    assert_eq!(plan.split_type, domain::SplitType::UpperLower);
    assert_eq!(plan.goal, domain::Goal::MuscleGain);
    assert_eq!(
        layout(&plan),
        vec![
            (1, domain::Focus::Rest, vec![0]),
            (2, domain::Focus::Upper, vec![1, 2, 3, 5]),
            (3, domain::Focus::Lower, vec![11, 13, 14, 15]),
            (4, domain::Focus::Rest, vec![0]),
            (5, domain::Focus::Upper, vec![1, 2, 3, 5]),
            (6, domain::Focus::Lower, vec![11, 13, 14, 15]),
        ]
    );
    for day in &plan.days {
        for (index, exercise) in day.exercises.iter().enumerate() {
            if day.focus == domain::Focus::Rest {
                assert_eq!((exercise.order, exercise.reps, exercise.sets), (0, 0, 0));
            } else {
                assert_eq!(exercise.order as usize, index + 1);
                assert_eq!((exercise.reps, exercise.sets), (8, 3));
            }
        }
    }
}

#[tokio::test]
async fn test_generate_plan_returns_stored_plan() {
    let (store, service) = setup(&[&*PROFILE]).await;

    let plan = service.generate_plan(PROFILE.user_id).await.unwrap();

    assert_eq!(store.read_active_plan(PROFILE.user_id).await.unwrap(), plan);
}

#[tokio::test]
async fn test_generate_plan_with_settings() {
    let (_, service) = setup_with_settings(
        &[&*PROFILE],
        domain::Settings {
            exercises_per_day: 2,
            sets_per_exercise: 5,
            max_replacements: 1,
        },
    )
    .await;

    let plan = service.generate_plan(PROFILE.user_id).await.unwrap();

    assert_eq!(
        layout(&plan)[1..3].to_vec(),
        vec![
            (2, domain::Focus::Upper, vec![1, 2]),
            (3, domain::Focus::Lower, vec![12, 13]),
        ]
    );
    assert!(
        plan.exercises()
            .filter(|e| !e.is_rest())
            .all(|e| e.sets == 5)
    );

    let replacements = service
        .get_recommended_replacements(PROFILE.user_id)
        .await
        .unwrap();
    let squat = replacements
        .iter()
        .find(|r| *r.original_exercise_id == 12)
        .unwrap();
    assert_eq!(
        squat
            .alternatives
            .iter()
            .map(|a| *a.exercise_id)
            .collect::<Vec<_>>(),
        vec![11]
    );
}

#[tokio::test]
async fn test_generate_plan_twice_keeps_one_active_plan() {
    let (store, service) = setup(&[&*PROFILE]).await;

    let first = service.generate_plan(PROFILE.user_id).await.unwrap();
    let second = service.generate_plan(PROFILE.user_id).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(layout(&first), layout(&second));
    assert_eq!(
        store.read_active_plan(PROFILE.user_id).await.unwrap().id,
        second.id
    );
    assert!(matches!(
        service
            .edit_reps(
                PROFILE.user_id,
                first.days[1].exercises[0].id,
                domain::Reps::new(12).unwrap()
            )
            .await,
        Err(domain::PlanError::ExerciseNotInPlan)
    ));
}

#[tokio::test]
async fn test_generate_plan_failure_keeps_previous_plan() {
    let (store, service) = setup(&[&*PROFILE]).await;
    let previous = service.generate_plan(PROFILE.user_id).await.unwrap();

    service
        .replace_profile(domain::Profile {
            split_type: domain::SplitType::PushPullLegs,
            frequency: 3,
            rest_days: vec![],
            ..PROFILE.clone()
        })
        .await
        .unwrap();
    for id in [7, 8, 9] {
        store.delete_exercise(id.into()).unwrap();
    }

    assert!(matches!(
        service.generate_plan(PROFILE.user_id).await,
        Err(domain::PlanError::NoSuitableExercises(domain::Focus::Pull))
    ));
    assert_eq!(
        store.read_active_plan(PROFILE.user_id).await.unwrap(),
        previous
    );
}

#[tokio::test]
async fn test_generate_plan_no_suitable_exercises() {
    let (store, service) = setup(&[&*PROFILE_2]).await;

    assert!(matches!(
        service.generate_plan(PROFILE_2.user_id).await,
        Err(domain::PlanError::NoSuitableExercises(domain::Focus::Pull))
    ));
    assert!(matches!(
        store.read_active_plan(PROFILE_2.user_id).await,
        Err(domain::ReadError::NotFound)
    ));
}

#[rstest]
#[case(
    domain::SplitType::BroSplit,
    4,
    vec![],
    domain::ScheduleError::BroSplitFrequency(4)
)]
#[case(
    domain::SplitType::FullBody,
    4,
    vec![1, 2, 3, 4],
    domain::ScheduleError::NotEnoughTrainingDays { rest_days: 4, available: 3, frequency: 4 }
)]
#[case(
    domain::SplitType::PushPullLegs,
    4,
    vec![7],
    domain::ScheduleError::PushPullLegsFrequency(4)
)]
#[case(
    domain::SplitType::UpperLower,
    2,
    vec![0],
    domain::ScheduleError::InvalidRestDay(0)
)]
#[tokio::test]
async fn test_generate_plan_invalid_schedule(
    #[case] split_type: domain::SplitType,
    #[case] frequency: u32,
    #[case] rest_days: Vec<u32>,
    #[case] expected: domain::ScheduleError,
) {
    let profile = domain::Profile {
        split_type,
        frequency,
        rest_days,
        ..PROFILE.clone()
    };
    let (store, service) = setup(&[&profile]).await;

    assert!(matches!(
        service.generate_plan(PROFILE.user_id).await,
        Err(domain::PlanError::InvalidScheduleConfig(err)) if err == expected
    ));
    assert!(matches!(
        store.read_active_plan(PROFILE.user_id).await,
        Err(domain::ReadError::NotFound)
    ));
}

#[tokio::test]
async fn test_generate_plan_without_profile() {
    let (_, service) = setup(&[]).await;

    assert!(matches!(
        service.generate_plan(PROFILE.user_id).await,
        Err(domain::PlanError::ProfileNotFound)
    ));
}

#[tokio::test]
async fn test_generate_plan_without_matching_exercises() {
    let service = Service::new(MemoryStore::new());
    service.replace_profile(PROFILE.clone()).await.unwrap();

    assert!(matches!(
        service.generate_plan(PROFILE.user_id).await,
        Err(domain::PlanError::NoMatchingExercises)
    ));
}

#[tokio::test]
async fn test_get_plan() {
    let (_, service) = setup(&[&*PROFILE]).await;
    let plan = service.generate_plan(PROFILE.user_id).await.unwrap();

    let overview = service.get_plan(PROFILE.user_id).await.unwrap();

    assert_eq!(overview.plan_id, plan.id);
    assert_eq!(overview.created_at, plan.created_at);
    assert_eq!(overview.days.len(), 6);
    assert_eq!(overview.days[0].exercises.len(), 1);
    assert!(overview.days[0].exercises[0].is_rest());
    assert_eq!(overview.days[0].exercises[0].name, "Rest Day");
    assert_eq!(
        overview.days[1]
            .exercises
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Bench Press", "Push-Up", "Dumbbell Fly", "Lateral Raise"]
    );
    assert_eq!(overview.days[1].exercises[0].equipment, "Barbell");
    assert_eq!(
        overview.bmi.advice,
        "Maintain balance across strength and cardio."
    );
    assert_eq!(
        (
            overview.calories.per_session,
            overview.calories.weekly,
            overview.calories.total
        ),
        (225.0, 900.0, 3600.0)
    );
    assert_eq!(overview.nutrition.calories, 2880);
    assert_eq!(
        overview.training_advice,
        domain::metrics::training_advice(&domain::Goal::MuscleGain)
    );
}

#[tokio::test]
async fn test_get_plan_skips_exercises_missing_from_catalog() {
    let (store, service) = setup(&[&*PROFILE]).await;
    service.generate_plan(PROFILE.user_id).await.unwrap();
    store.delete_exercise(2.into()).unwrap();

    let overview = service.get_plan(PROFILE.user_id).await.unwrap();

    assert_eq!(
        overview.days[1]
            .exercises
            .iter()
            .map(|e| *e.exercise_id)
            .collect::<Vec<_>>(),
        vec![1, 3, 5]
    );
}

#[tokio::test]
async fn test_get_plan_without_plan() {
    let (_, service) = setup(&[&*PROFILE]).await;

    assert!(matches!(
        service.get_plan(PROFILE.user_id).await,
        Err(domain::PlanError::PlanNotFound)
    ));
}

#[tokio::test]
async fn test_delete_plan() {
    let (_, service) = setup(&[&*PROFILE]).await;
    let plan = service.generate_plan(PROFILE.user_id).await.unwrap();

    assert_eq!(service.delete_plan(PROFILE.user_id).await.unwrap(), plan.id);
    assert!(matches!(
        service.get_plan(PROFILE.user_id).await,
        Err(domain::PlanError::PlanNotFound)
    ));
    assert!(matches!(
        service.delete_plan(PROFILE.user_id).await,
        Err(domain::PlanError::PlanNotFound)
    ));
}

#[rstest]
#[case(2, domain::Focus::Upper, 4, 1360.0)]
#[case(3, domain::Focus::Lower, 4, 1360.0)]
#[case(4, domain::Focus::Rest, 1, 0.0)]
#[tokio::test]
async fn test_get_workout_for_day(
    #[case] day_number: u32,
    #[case] focus: domain::Focus,
    #[case] exercise_count: usize,
    #[case] calories_burned: f64,
) {
    let (_, service) = setup(&[&*PROFILE]).await;
    service.generate_plan(PROFILE.user_id).await.unwrap();

    let workout = service
        .get_workout_for_day(PROFILE.user_id, day_number)
        .await
        .unwrap();

    assert_eq!(workout.day.day_number, day_number);
    assert_eq!(workout.day.focus, focus);
    assert_eq!(workout.day.exercises.len(), exercise_count);
    assert_approx_eq!(workout.calories_burned, calories_burned);
}

#[tokio::test]
async fn test_get_workout_for_unassigned_day() {
    let (_, service) = setup(&[&*PROFILE]).await;
    service.generate_plan(PROFILE.user_id).await.unwrap();

    assert!(matches!(
        service.get_workout_for_day(PROFILE.user_id, 7).await,
        Err(domain::PlanError::DayNotFound(7))
    ));
}

#[tokio::test]
async fn test_get_workout_today() {
    let (_, service) = setup(&[&*PROFILE]).await;
    service.generate_plan(PROFILE.user_id).await.unwrap();
    let today = Local::now().weekday().number_from_monday();

    match service.get_workout_today(PROFILE.user_id).await {
        Ok(workout) => assert_eq!(workout.day.day_number, today),
        Err(domain::PlanError::DayNotFound(day_number)) => {
            assert_eq!((day_number, today), (7, 7));
        }
        Err(err) => panic!("unexpected error: {err}"),
    }
}

#[tokio::test]
async fn test_replace_exercise() {
    let (store, service) = setup(&[&*PROFILE]).await;
    let plan = service.generate_plan(PROFILE.user_id).await.unwrap();

    let updated = service
        .replace_exercise(PROFILE.user_id, 1.into(), 18.into())
        .await
        .unwrap();

    assert_eq!(
        updated,
        domain::WorkoutPlanExercise {
            exercise_id: 18.into(),
            ..plan.days[1].exercises[0].clone()
        }
    );
    let stored = store.read_active_plan(PROFILE.user_id).await.unwrap();
    assert_eq!(layout(&stored)[1].2, vec![18, 2, 3, 5]);
    assert_eq!(layout(&stored)[4].2, vec![1, 2, 3, 5]);
}

#[rstest]
#[case(7, 4, domain::PlanError::ExerciseNotInPlan)]
#[case(0, 4, domain::PlanError::ExerciseNotInPlan)]
#[case(1, 99, domain::PlanError::ExerciseNotFound(99.into()))]
#[tokio::test]
async fn test_replace_exercise_failure(
    #[case] original: u64,
    #[case] new: u64,
    #[case] expected: domain::PlanError,
) {
    let (store, service) = setup(&[&*PROFILE]).await;
    let plan = service.generate_plan(PROFILE.user_id).await.unwrap();

    let result = service
        .replace_exercise(PROFILE.user_id, original.into(), new.into())
        .await;

    assert_eq!(result.unwrap_err().to_string(), expected.to_string());
    assert_eq!(store.read_active_plan(PROFILE.user_id).await.unwrap(), plan);
}

#[tokio::test]
async fn test_replace_exercise_without_plan() {
    let (_, service) = setup(&[&*PROFILE]).await;

    assert!(matches!(
        service
            .replace_exercise(PROFILE.user_id, 1.into(), 18.into())
            .await,
        Err(domain::PlanError::PlanNotFound)
    ));
}

#[tokio::test]
async fn test_edit_reps() {
    let (store, service) = setup(&[&*PROFILE]).await;
    let plan = service.generate_plan(PROFILE.user_id).await.unwrap();
    let row = plan.days[2].exercises[1].clone();

    let updated = service
        .edit_reps(PROFILE.user_id, row.id, domain::Reps::new(12).unwrap())
        .await
        .unwrap();

    assert_eq!(updated, domain::WorkoutPlanExercise { reps: 12, ..row });
    let stored = store.read_active_plan(PROFILE.user_id).await.unwrap();
    assert_eq!(stored.days[2].exercises[1].reps, 12);
    assert_eq!(stored.days[5].exercises[1].reps, 8);
}

#[tokio::test]
async fn test_edit_reps_failure() {
    let (store, service) = setup(&[&*PROFILE]).await;
    let plan = service.generate_plan(PROFILE.user_id).await.unwrap();
    let rest = plan.days[0].exercises[0].id;

    for id in [rest, 999.into()] {
        assert!(matches!(
            service
                .edit_reps(PROFILE.user_id, id, domain::Reps::new(12).unwrap())
                .await,
            Err(domain::PlanError::ExerciseNotInPlan)
        ));
    }
    assert_eq!(store.read_active_plan(PROFILE.user_id).await.unwrap(), plan);
}

#[tokio::test]
async fn test_get_recommended_replacements() {
    let (_, service) = setup(&[&*PROFILE]).await;
    service.generate_plan(PROFILE.user_id).await.unwrap();

    let replacements = service
        .get_recommended_replacements(PROFILE.user_id)
        .await
        .unwrap();

    assert_eq!(replacements.len(), 16);
    assert_eq!(
        replacements[..8]
            .iter()
            .map(|r| {
                (
                    *r.original_exercise_id,
                    r.alternatives
                        .iter()
                        .map(|a| *a.exercise_id)
                        .collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>(),
        vec![
            (1, vec![17]),
            (2, vec![17]),
            (3, vec![17]),
            (5, vec![4]),
            (11, vec![12, 16]),
            (13, vec![]),
            (14, vec![]),
            (15, vec![]),
        ]
    );
    assert_eq!(replacements[0].name, "Bench Press");
    assert_eq!(
        replacements[3].alternatives[0],
        domain::Alternative {
            exercise_id: 4.into(),
            name: "Overhead Press".to_string(),
            description: "How to do Overhead Press".to_string(),
        }
    );
}

#[tokio::test]
async fn test_get_recommended_replacements_without_plan() {
    let (_, service) = setup(&[&*PROFILE]).await;

    assert!(matches!(
        service.get_recommended_replacements(PROFILE.user_id).await,
        Err(domain::PlanError::PlanNotFound)
    ));
}

#[tokio::test]
async fn test_replace_profile() {
    let (_, service) = setup(&[]).await;

    let profile = service.replace_profile(PROFILE.clone()).await.unwrap();

    assert_eq!(profile.equipment, vec!["Barbell", "Dumbbell", "Body Only"]);
    assert_eq!(service.get_profile(PROFILE.user_id).await.unwrap(), profile);
}

#[rstest]
#[case(domain::Profile { frequency: 0, ..PROFILE.clone() })]
#[case(domain::Profile { duration_per_session: 0, ..PROFILE.clone() })]
#[case(domain::Profile { target_weight: -1.0, ..PROFILE.clone() })]
#[case(domain::Profile { equipment: vec!["Rowing Machine".to_string()], ..PROFILE.clone() })]
#[case(domain::Profile { split_type: domain::SplitType::from("Arnold"), ..PROFILE.clone() })]
#[case(domain::Profile { goal: domain::Goal::from("Yoga"), ..PROFILE.clone() })]
#[tokio::test]
async fn test_replace_profile_invalid(#[case] profile: domain::Profile) {
    let (_, service) = setup(&[]).await;

    assert!(matches!(
        service.replace_profile(profile).await,
        Err(domain::UpdateError::Other(_))
    ));
    assert!(matches!(
        service.get_profile(PROFILE.user_id).await,
        Err(domain::ReadError::NotFound)
    ));
}

#[tokio::test]
async fn test_delete_profile() {
    let (_, service) = setup(&[&*PROFILE]).await;

    assert_eq!(
        service.delete_profile(PROFILE.user_id).await.unwrap(),
        PROFILE.user_id
    );
    assert!(matches!(
        service.generate_plan(PROFILE.user_id).await,
        Err(domain::PlanError::ProfileNotFound)
    ));
}

#[tokio::test]
async fn test_get_exercises() {
    let (store, service) = setup(&[]).await;
    store.delete_exercise(18.into()).unwrap();

    assert_eq!(
        service.get_exercises().await.unwrap(),
        EXERCISES[..17].to_vec()
    );
    assert_eq!(
        service.get_exercise(4.into()).await.unwrap(),
        EXERCISES[3].clone()
    );
    assert!(matches!(
        service.get_exercise(18.into()).await,
        Err(domain::ReadError::NotFound)
    ));
}
