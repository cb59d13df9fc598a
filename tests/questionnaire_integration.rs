//! Integration tests for the scoring path
//!
//! Tests: delta → update → confidence → convergence → summary

use aptitude::core::{
    all_confidences, confidence, summarize, update, ConvergenceChecker, QuestionBank,
    QuestionnaireEngine, MemoryStore,
};
use aptitude::types::{
    ConvergedDimensions, Dimension, Domain, HollandCode, MbtiAxis, MbtiLetter, PartialWeights,
    PersonalityWeights, QuestionnaireState, Stage,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn e(amount: f64) -> PartialWeights {
    PartialWeights::new().with_mbti(MbtiLetter::E, amount)
}

fn i(amount: f64) -> PartialWeights {
    PartialWeights::new().with_mbti(MbtiLetter::I, amount)
}

/// Run deltas through a state the way the engine does
fn run(deltas: &[PartialWeights]) -> QuestionnaireState {
    let checker = ConvergenceChecker::default();
    let mut state = QuestionnaireState::new();
    for (n, delta) in deltas.iter().enumerate() {
        state.record_answer(&format!("Q{}", n + 1), 0, delta, &checker);
    }
    state
}

#[test]
fn test_three_strong_extravert_answers_converge() {
    let state = run(&[e(3.0), e(3.0), e(3.0)]);
    let w = &state.current_weights;

    assert_eq!(w.mbti.e, 9.0);
    assert_eq!(w.mbti.i, 0.0);
    assert_eq!(confidence(w, "E/I", Domain::Mbti), 1.0);
    assert!(state.converged_dimensions.contains(Dimension::Mbti(MbtiAxis::EI)));
}

#[test]
fn test_alternating_answers_stay_open() {
    let deltas: Vec<PartialWeights> = (0..10)
        .map(|n| if n % 2 == 0 { e(1.0) } else { i(1.0) })
        .collect();
    let state = run(&deltas);
    let w = &state.current_weights;

    assert_eq!(w.mbti.e, 5.0);
    assert_eq!(w.mbti.i, 5.0);
    assert_eq!(confidence(w, "E/I", Domain::Mbti), 0.0);
    assert!(!state.converged_dimensions.contains(Dimension::Mbti(MbtiAxis::EI)));
}

#[test]
fn test_update_is_additive() {
    let base = update(
        &PersonalityWeights::zero(),
        &PartialWeights::new().with_holland(HollandCode::S, 1.0),
    );
    let d1 = PartialWeights::new()
        .with_mbti(MbtiLetter::T, 2.0)
        .with_holland(HollandCode::S, 0.5);
    let d2 = PartialWeights::new()
        .with_mbti(MbtiLetter::F, 1.0)
        .with_holland(HollandCode::C, 3.0);

    assert_eq!(
        update(&update(&base, &d1), &d2),
        update(&base, &d1.merge(&d2))
    );
}

#[test]
fn test_equal_nonzero_pair_has_zero_confidence() {
    for axis in MbtiAxis::ALL {
        let mut w = PersonalityWeights::zero();
        *w.mbti.get_mut(axis.left()) = 2.5;
        *w.mbti.get_mut(axis.right()) = 2.5;
        assert_eq!(confidence(&w, axis.label(), Domain::Mbti), 0.0);
    }
}

#[test]
fn test_one_sided_pair_has_full_confidence() {
    for axis in MbtiAxis::ALL {
        let mut w = PersonalityWeights::zero();
        *w.mbti.get_mut(axis.right()) = 0.75;
        assert_eq!(confidence(&w, axis.label(), Domain::Mbti), 1.0);
    }
}

#[test]
fn test_convergence_never_shrinks() {
    let checker = ConvergenceChecker::default();
    let mut state = QuestionnaireState::new();
    let mut previous = ConvergedDimensions::new();

    // push E/I one way, then hard the other way
    let deltas = [e(4.0), e(4.0), i(2.0), i(8.0), i(8.0)];
    for (n, delta) in deltas.iter().enumerate() {
        state.record_answer(&format!("Q{}", n), 0, delta, &checker);
        for d in previous.iter() {
            assert!(state.converged_dimensions.contains(d), "{} un-converged", d);
        }
        previous = state.converged_dimensions.clone();
    }
    assert!(previous.contains(Dimension::Mbti(MbtiAxis::EI)));
}

#[test]
fn test_holland_needs_evidence_per_letter() {
    let inv = PartialWeights::new().with_holland(HollandCode::I, 3.0);
    let state = run(&[inv.clone(), inv]);

    let converged: Vec<HollandCode> = state.converged_dimensions.holland.iter().copied().collect();
    assert_eq!(converged, vec![HollandCode::I]);
    // unobserved letters still score 1.0 against the mean, yet stay open
    assert_eq!(confidence(&state.current_weights, "R", Domain::Holland), 1.0);
    assert!(!state.converged_dimensions.contains(Dimension::Holland(HollandCode::R)));
}

#[test]
fn test_default_bank_keeps_asking_about_open_holland_letters() {
    let mut engine = QuestionnaireEngine::new(
        Arc::new(QuestionBank::default_bank()),
        Box::new(MemoryStore::new()),
        ConvergenceChecker::default(),
    );
    engine.start().unwrap();
    for _ in 0..3 {
        engine.answer(0).unwrap();
    }

    let state = engine.state();
    assert!(state.converged_dimensions.contains(Dimension::Holland(HollandCode::I)));
    for code in [HollandCode::R, HollandCode::A, HollandCode::S, HollandCode::E, HollandCode::C] {
        if state.current_weights.holland.get(code) == 0.0 {
            assert!(!state.converged_dimensions.contains(Dimension::Holland(code)));
        }
    }
    assert!(!engine.is_complete());
}

#[test]
fn test_stage_follows_question_count() {
    let stages: Vec<Stage> = (0..6)
        .map(|n| {
            let deltas: Vec<PartialWeights> = (0..n).map(|_| e(0.1)).collect();
            run(&deltas).stage
        })
        .collect();
    assert_eq!(
        stages,
        vec![
            Stage::Icebreaker,
            Stage::Behavior,
            Stage::Behavior,
            Stage::Behavior,
            Stage::Situation,
            Stage::Situation,
        ]
    );
}

#[test]
fn test_confidence_scores_cover_all_dimensions() {
    let state = run(&[PartialWeights::new().with_holland(HollandCode::A, 2.0)]);
    assert_eq!(state.confidence_scores, all_confidences(&state.current_weights));
    assert_eq!(state.confidence_scores.len(), 10);
}

#[test]
fn test_summary_of_clear_profile() {
    let state = run(&[
        PartialWeights::new()
            .with_mbti(MbtiLetter::I, 3.0)
            .with_mbti(MbtiLetter::N, 3.0)
            .with_mbti(MbtiLetter::T, 3.0)
            .with_mbti(MbtiLetter::J, 3.0)
            .with_holland(HollandCode::I, 4.0)
            .with_holland(HollandCode::A, 2.0)
            .with_holland(HollandCode::R, 1.0),
    ]);
    let summary = summarize(&state.current_weights);
    assert_eq!(summary.mbti, "INTJ");
    assert_eq!(summary.holland, "IAR");
    assert_eq!(summary.dominant_interest, HollandCode::I);
    assert_eq!(summary.recommendations[0].name, "Computer Science");
}

#[test]
fn test_engine_with_default_bank_terminates() {
    let mut engine = QuestionnaireEngine::new(
        Arc::new(QuestionBank::default_bank()),
        Box::new(MemoryStore::new()),
        ConvergenceChecker::default(),
    );
    engine.start().unwrap();

    // always pick the last option
    while let Some(question) = engine.pending().cloned() {
        engine.answer(question.options.len() - 1).unwrap();
    }

    assert!(engine.is_complete());
    let state = engine.state();
    assert!(state.is_consistent());
    assert!(state.question_number as usize <= QuestionBank::default_bank().len());
    assert!(state.completed_at.is_some());
}
