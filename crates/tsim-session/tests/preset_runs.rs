//! Full-run tests over the bundled preset.

use proptest::prelude::*;

use tsim_core::preset::therapy_1987;
use tsim_core::{ContentCatalog, Stat};
use tsim_session::{
    EndReason, InvalidAction, Run, RunConfig, SessionError, Strategy, View, autoplay, start_run,
};

fn catalog() -> ContentCatalog {
    therapy_1987().expect("bundled content should load")
}

fn simulate(class: &str, seed: u64, strategy: Strategy) -> Run {
    let mut run = Run::start(catalog(), class, RunConfig::default().with_seed(seed))
        .expect("run should start");
    autoplay(&mut run, strategy, 500).expect("autoplay should not fail");
    run
}

#[test]
fn run_opens_at_the_community_center() {
    let run = Run::start(catalog(), "counselor", RunConfig::default()).unwrap();
    match run.current_view() {
        View::Dialogue {
            location, choices, ..
        } => {
            assert_eq!(location, "Community Center");
            assert!(!choices.is_empty());
        }
        other => panic!("expected dialogue, got {other:?}"),
    }
    assert_eq!(run.profile().reputation, 10);
    assert_eq!(run.profile().inventory.uses("coffee"), 2);
}

#[test]
fn same_seed_same_run() {
    let a = simulate("empath", 7, Strategy::Empathetic);
    let b = simulate("empath", 7, Strategy::Empathetic);
    assert_eq!(a.ending(), b.ending());
    assert_eq!(a.profile(), b.profile());
    assert_eq!(a.journal().export_markdown(), b.journal().export_markdown());
}

#[test]
fn every_class_reaches_an_ending() {
    for class in ["empath", "counselor", "burnout"] {
        for strategy in [Strategy::First, Strategy::Empathetic] {
            let run = simulate(class, 42, strategy);
            assert!(run.is_finished(), "{class}/{strategy} did not finish");
            assert!(run.end_reason().is_some());
            assert!(run.profile().verify_bounds().is_ok());
        }
    }
}

#[test]
fn journal_brackets_the_run() {
    let run = simulate("counselor", 3, Strategy::Empathetic);
    let md = run.journal().export_markdown();
    assert!(md.starts_with("# Therapy Run Journal"));
    assert!(md.contains("**Run started** as counselor (seed 3)"));
    assert!(md.contains("## Toaster Guy at Community Center") || md.contains("## Mime Lady at Community Center"));
    assert!(md.contains("**Run ended**"));
}

#[test]
fn unknown_class_is_a_content_error() {
    assert!(matches!(
        Run::start(catalog(), "wizard", RunConfig::default()),
        Err(SessionError::Content(_))
    ));
}

#[test]
fn coffee_runs_out_through_the_handle() {
    let handle = start_run(catalog(), "burnout", RunConfig::default()).unwrap();
    handle.use_item("coffee").unwrap();
    let last = handle.use_item("coffee").unwrap();
    assert_eq!(last.used.remaining, 0);

    let before = handle.profile().unwrap();
    assert!(matches!(
        handle.use_item("coffee"),
        Err(SessionError::EmptyInventory(ref id)) if id == "coffee"
    ));
    let after = handle.profile().unwrap();
    assert_eq!(after.inventory.uses("coffee"), 0);
    assert_eq!(after.stat(Stat::Composure), before.stat(Stat::Composure));
}

#[test]
fn ending_on_request_blocks_further_actions() {
    let handle = start_run(catalog(), "empath", RunConfig::default()).unwrap();
    let ending = handle.request_ending_now().unwrap();
    assert_eq!(handle.ending().unwrap(), Some(ending));
    assert!(matches!(
        handle.submit_choice(0),
        Err(SessionError::InvalidAction(InvalidAction::RunFinished))
    ));
    let journal = handle.journal().unwrap();
    assert!(journal.export_markdown().contains("(ended by request)"));
}

#[test]
fn progress_starts_at_zero() {
    let handle = start_run(catalog(), "counselor", RunConfig::default()).unwrap();
    let summary = handle.progress_summary().unwrap();
    assert_eq!(
        summary.to_string(),
        "Community Center: 0/2 clients (2 remaining), next: Corporate Wellness Program"
    );

    let endings = handle.ending_progress().unwrap();
    let celebrity = endings
        .iter()
        .find(|p| p.ending_id == "celebrity")
        .expect("celebrity has a reputation threshold");
    assert_eq!(celebrity.to_string(), "Reputation: 10/16 (The Celebrity Therapist)");
    let zen: Vec<_> = endings.iter().filter(|p| p.ending_id == "zen_master").collect();
    assert_eq!(zen.len(), 2);
}

#[test]
fn meltdown_ends_in_breakdown() {
    let config = RunConfig::default()
        .with_combat(tsim_mechanics::CombatRules::default().with_max_sanity(1));
    let mut run = Run::start(catalog(), "burnout", config).unwrap();
    autoplay(&mut run, Strategy::First, 500).unwrap();
    assert!(run.is_finished());
    if run.end_reason() == Some(EndReason::Meltdown) {
        assert_eq!(
            run.ending().map(|e| e.title.as_str()),
            Some("Mental Breakdown")
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn any_seed_finishes_in_bounds(seed in 0u64..10_000) {
        let run = simulate("counselor", seed, Strategy::First);
        prop_assert!(run.is_finished());
        prop_assert!(run.profile().verify_bounds().is_ok());
    }
}
