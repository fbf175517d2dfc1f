use training_plan::*;

#[test]
fn test_objectives_abbreviation() {
    assert_eq!(objectives_abbreviation(""), "GENERAL");
    assert_eq!(objectives_abbreviation("Have fun"), "GENERAL");
    assert_eq!(objectives_abbreviation("Improve TECHNIQUE"), "TECH");
    assert_eq!(
        objectives_abbreviation("Tactical pressing and fitness"),
        "TACT/PHYS"
    );
    assert_eq!(
        objectives_abbreviation("mental focus, technical passing, tactics, physical"),
        "TECH/TACT/PHYS/MENT"
    );
}

#[test]
fn test_format_session_date() {
    assert_eq!(format_session_date("2025-03-04"), "March 4, 2025");
    assert_eq!(format_session_date("2024-12-25"), "December 25, 2024");
    assert_eq!(format_session_date("next tuesday"), "next tuesday");
}

#[test]
fn test_load_level_color_endpoints() {
    assert_eq!(load_level_color(1), (16, 185, 129));
    assert_eq!(load_level_color(10), (239, 68, 68));
    // Out-of-range values are clamped
    assert_eq!(load_level_color(0), load_level_color(1));
    assert_eq!(load_level_color(200), load_level_color(10));
}

#[test]
fn test_load_level_color_gets_redder() {
    let reds: Vec<u8> = (1..=10).map(|level| load_level_color(level).0).collect();
    let greens: Vec<u8> = (5..=10).map(|level| load_level_color(level).1).collect();
    assert!(reds[..7].windows(2).all(|w| w[0] <= w[1]));
    assert!(greens.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_session_summary() {
    let mut session = Session {
        duration_minutes: 60,
        ..Default::default()
    };
    let specs = [
        (ExerciseType::WarmUp, 15, 1),
        (ExerciseType::Main, 30, 2),
        (ExerciseType::Main, 20, 0),
        (ExerciseType::CoolDown, 5, 0),
    ];
    for (i, (kind, minutes, points)) in specs.into_iter().enumerate() {
        session.exercises.push(Exercise {
            id: ExerciseId(format!("exercise-{}", i + 1)),
            kind,
            duration_minutes: minutes,
            coaching_points: vec!["point".to_string(); points],
            ..Default::default()
        });
    }
    session.exercises[1].illustration = Some(Illustration::image("https://cdn.example/a.png"));

    let summary = SessionSummary::from_session(&session);
    assert_eq!(summary.exercise_count, 4);
    assert_eq!(summary.total_exercise_minutes, 70);
    assert_eq!(summary.overrun_minutes(), 10);
    assert_eq!(
        summary.minutes_by_type,
        vec![
            (ExerciseType::WarmUp, 15),
            (ExerciseType::Main, 50),
            (ExerciseType::CoolDown, 5),
        ]
    );
    assert_eq!(summary.coaching_points, 3);
    assert_eq!(summary.illustrated, 1);
    assert_eq!(summary.page_count, None);

    let pagination = paginate(
        &session.exercises,
        &HeightEstimator::default(),
        &PageSetup::default().budget_for(&session),
    );
    let summary = summary.with_pagination(&pagination);
    assert_eq!(summary.page_count, Some(pagination.page_count()));
    assert_eq!(total_duration(&session), 70);
}

#[test]
fn test_display_names() {
    let session = Session::default();
    assert_eq!(session.display_name(), "TRAINING SESSION");
    let exercise = Exercise::default();
    assert_eq!(exercise.display_name(), "Untitled Exercise");
}

#[test]
fn test_durations_saturate() {
    let mut session = Session::default();
    for _ in 0..2 {
        session.exercises.push(Exercise {
            duration_minutes: u32::MAX,
            ..Default::default()
        });
    }

    assert_eq!(total_duration(&session), u32::MAX);
    let summary = SessionSummary::from_session(&session);
    assert_eq!(summary.total_exercise_minutes, u32::MAX);
    assert_eq!(summary.minutes_by_type[1], (ExerciseType::Main, u32::MAX));
}
