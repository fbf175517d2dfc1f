use training_plan::*;

fn exercise(id: usize, height: u32) -> Exercise {
    Exercise {
        id: ExerciseId(format!("exercise-{}", id)),
        duration_minutes: height,
        ..Default::default()
    }
}

fn sequence(heights: &[u32]) -> Vec<Exercise> {
    heights
        .iter()
        .enumerate()
        .map(|(i, h)| exercise(i + 1, *h))
        .collect()
}

fn by_duration(ex: &Exercise) -> f32 {
    ex.duration_minutes as f32
}

fn budget(first: f32, continuation: f32, spacing: f32, footer: f32) -> PageBudget {
    PageBudget {
        first_page: first,
        continuation_page: continuation,
        spacing,
        footer,
    }
}

/// Small deterministic generator so the sweeps below are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u32) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) % bound as u64) as u32
    }
}

fn random_cases() -> Vec<(Vec<Exercise>, PageBudget)> {
    let mut rng = Lcg(42);
    (0..300)
        .map(|_| {
            let count = rng.next(25) as usize;
            let heights: Vec<u32> = (0..count).map(|_| 20 + rng.next(700)).collect();
            let first = 200.0 + rng.next(400) as f32;
            let continuation = first + rng.next(300) as f32;
            let spacing = rng.next(20) as f32;
            let footer = rng.next(200) as f32;
            (sequence(&heights), budget(first, continuation, spacing, footer))
        })
        .collect()
}

#[test]
fn test_scenario_first_page_then_continuation() {
    let exercises = sequence(&[300, 250, 100]);
    let result = paginate(&exercises, &by_duration, &budget(500.0, 800.0, 12.0, 0.0));

    let ids: Vec<Vec<&str>> = result
        .iter()
        .map(|page| page.slice(&exercises).iter().map(|ex| ex.id.as_str()).collect())
        .collect();
    assert_eq!(
        ids,
        vec![vec!["exercise-1"], vec!["exercise-2", "exercise-3"]]
    );
    assert_eq!(result.pages[0].kind, PageKind::First);
    assert_eq!(result.pages[1].kind, PageKind::Continuation);
}

#[test]
fn test_scenario_footer_page() {
    let exercises = sequence(&[400]);
    let result = paginate(&exercises, &by_duration, &budget(500.0, 800.0, 12.0, 150.0));
    assert_eq!(result.page_count(), 2);
    assert_eq!(result.pages[0].len(), 1);
    assert!(result.pages[1].is_empty());
    assert!(result.footer_page);
}

#[test]
fn test_scenario_oversized_single() {
    let exercises = sequence(&[900]);
    let result = paginate(&exercises, &by_duration, &budget(500.0, 800.0, 12.0, 0.0));
    assert_eq!(result.page_count(), 1);
    assert_eq!(result.pages[0].exercises, 0..1);
}

#[test]
fn test_empty_input_yields_one_empty_page() {
    let result = paginate(&[], &by_duration, &budget(500.0, 800.0, 12.0, 150.0));
    assert_eq!(result.page_count(), 1);
    assert!(result.pages[0].is_empty());
}

#[test]
fn test_pages_concatenate_to_sequence() {
    for (exercises, budget) in random_cases() {
        let result = paginate(&exercises, &by_duration, &budget);
        let flattened: Vec<&ExerciseId> = result
            .iter()
            .flat_map(|page| page.slice(&exercises))
            .map(|ex| &ex.id)
            .collect();
        let expected: Vec<&ExerciseId> = exercises.iter().map(|ex| &ex.id).collect();
        assert_eq!(flattened, expected);
    }
}

#[test]
fn test_pages_respect_budget_unless_oversized_singleton() {
    for (exercises, budget) in random_cases() {
        let result = paginate(&exercises, &by_duration, &budget);
        for page in &result {
            let used = used_height(page.slice(&exercises), &by_duration, budget.spacing);
            let limit = budget.for_kind(page.kind);
            if used > limit {
                assert_eq!(page.len(), 1, "only a lone block may overflow: {:?}", page);
            }
        }
    }
}

#[test]
fn test_only_first_page_is_first() {
    for (exercises, budget) in random_cases() {
        let result = paginate(&exercises, &by_duration, &budget);
        assert_eq!(result.pages[0].kind, PageKind::First);
        assert!(
            result.pages[1..]
                .iter()
                .all(|page| page.kind == PageKind::Continuation)
        );
    }
}

#[test]
fn test_only_footer_page_is_empty() {
    for (exercises, budget) in random_cases() {
        let result = paginate(&exercises, &by_duration, &budget);
        if exercises.is_empty() {
            continue;
        }
        let empty: Vec<usize> = result
            .iter()
            .enumerate()
            .filter(|(_, page)| page.is_empty())
            .map(|(i, _)| i)
            .collect();
        if result.footer_page {
            assert_eq!(empty, vec![result.page_count() - 1]);
            assert_eq!(result.page_count(), 2);
        } else {
            assert!(empty.is_empty());
        }
    }
}

#[test]
fn test_idempotent() {
    for (exercises, budget) in random_cases() {
        let first = paginate(&exercises, &by_duration, &budget);
        let second = paginate(&exercises, &by_duration, &budget);
        assert_eq!(first, second);
    }
}

#[test]
fn test_estimator_drives_pagination() {
    let setup = PageSetup::export(PaperSize::A4);
    let mut session = Session::default();
    for i in 0..12 {
        session.exercises.push(Exercise {
            id: ExerciseId(format!("exercise-{}", i + 1)),
            name: format!("Drill {}", i + 1),
            description: "Pass and move in triangles, switching the point of attack. ".repeat(4),
            coaching_points: vec!["Open body shape".into(), "Scan before receiving".into()],
            equipment: "Cones, bibs".into(),
            ..Default::default()
        });
    }

    let estimator = HeightEstimator::for_context(RenderContext::Export);
    let budget = setup.budget_for(&session);
    let result = paginate(&session.exercises, &estimator, &budget);

    assert!(result.page_count() > 1);
    let total: usize = result.iter().map(PageGroup::len).sum();
    assert_eq!(total, session.exercises.len());
}

#[test]
fn test_measured_heights_override_estimates() {
    let exercises = sequence(&[0, 0, 0]);
    let mut measured = MeasuredHeights::new(Unmeasured::Flat(100.0));
    measured.record(ExerciseId::new("exercise-1"), 450.0);

    // 450 alone fits; 450 + 10 + 100 does not
    let result = paginate(&exercises, &measured, &budget(500.0, 800.0, 10.0, 0.0));
    let ranges: Vec<_> = result.iter().map(|p| p.exercises.clone()).collect();
    assert_eq!(ranges, vec![0..1, 1..3]);
}

#[test]
fn test_estimate_is_monotonic_in_content() {
    for context in [RenderContext::Preview, RenderContext::Export] {
        let estimator = HeightEstimator::for_context(context);
        let mut ex = exercise(1, 10);
        let mut previous = estimator.estimate(&ex);

        let edits: Vec<Box<dyn Fn(&mut Exercise)>> = vec![
            Box::new(|ex: &mut Exercise| ex.description.push_str("Short description.")),
            Box::new(|ex: &mut Exercise| ex.coaching_points.push("Communicate".into())),
            Box::new(|ex: &mut Exercise| ex.coaching_points.push("Play forward".into())),
            Box::new(|ex: &mut Exercise| ex.equipment = "Balls".into()),
            Box::new(|ex: &mut Exercise| ex.players = "11v11".into()),
            Box::new(|ex: &mut Exercise| ex.area = "Full pitch".into()),
            Box::new(|ex: &mut Exercise| ex.variations = "Limit touches".into()),
            Box::new(|ex: &mut Exercise| ex.illustration = Some(Illustration::image("data:image/png;base64,AAAA"))),
            Box::new(|ex: &mut Exercise| ex.description.push_str(&"More detail. ".repeat(40))),
            Box::new(|ex: &mut Exercise| ex.coaching_points.push("Finish early".into())),
        ];

        for edit in edits {
            edit(&mut ex);
            let next = estimator.estimate(&ex);
            assert!(next >= previous, "{:?}: {} < {}", context, next, previous);
            assert!(next.is_finite() && next > 0.0);
            previous = next;
        }
    }
}
