//! Convergence checker: decide which dimensions need no more questions
//!
//! A dimension converges when:
//! - its confidence ≥ threshold, AND
//! - enough weight has been observed (pair total for MBTI, all six letters
//!   for Holland), AND
//! - for Holland, the letter itself has been observed at least once
//!
//! Decisions are sticky: `check_sticky` only ever adds to the previous set.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::confidence::dimension_confidence;
use crate::types::{ConvergedDimensions, Dimension, PersonalityWeights};
use crate::{CONVERGENCE_THRESHOLD, MIN_OBSERVED_WEIGHT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceChecker {
    pub threshold: f64,
    pub min_observed_weight: f64,
}

impl Default for ConvergenceChecker {
    fn default() -> Self {
        Self::new(CONVERGENCE_THRESHOLD, MIN_OBSERVED_WEIGHT)
    }
}

impl ConvergenceChecker {
    pub fn new(threshold: f64, min_observed_weight: f64) -> Self {
        Self {
            threshold,
            min_observed_weight,
        }
    }

    /// Total weight observed for the evidence behind `dimension`
    fn observed(&self, weights: &PersonalityWeights, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Mbti(axis) => {
                weights.mbti.get(axis.left()) + weights.mbti.get(axis.right())
            }
            Dimension::Holland(_) => weights.holland.total(),
        }
    }

    /// Whether one dimension passes both the threshold and the data guard
    pub fn is_converged(
        &self,
        weights: &PersonalityWeights,
        dimension: Dimension,
        confidence: f64,
    ) -> bool {
        let observed = self.observed(weights, dimension);
        let own_evidence = match dimension {
            Dimension::Mbti(_) => true,
            Dimension::Holland(code) => weights.holland.get(code) > 0.0,
        };
        own_evidence
            && observed > 0.0
            && observed >= self.min_observed_weight
            && confidence >= self.threshold
    }

    /// Snapshot of converged dimensions for the current weights.
    ///
    /// Scores missing from `confidence_scores` are computed on the spot.
    pub fn check(
        &self,
        weights: &PersonalityWeights,
        confidence_scores: &BTreeMap<String, f64>,
    ) -> ConvergedDimensions {
        let mut converged = ConvergedDimensions::new();
        for dimension in Dimension::all() {
            let confidence = confidence_scores
                .get(&dimension.label())
                .copied()
                .unwrap_or_else(|| dimension_confidence(weights, dimension));
            if self.is_converged(weights, dimension, confidence) {
                converged.insert(dimension);
            }
        }
        converged
    }

    /// Snapshot unioned with `previous`; never un-converges a dimension
    pub fn check_sticky(
        &self,
        weights: &PersonalityWeights,
        confidence_scores: &BTreeMap<String, f64>,
        previous: &ConvergedDimensions,
    ) -> ConvergedDimensions {
        let snapshot = self.check(weights, confidence_scores);
        let merged = previous.union(&snapshot);
        debug!(
            snapshot = snapshot.len(),
            sticky = merged.len(),
            "convergence checked"
        );
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{all_confidences, update};
    use crate::types::{HollandCode, MbtiAxis, MbtiLetter, PartialWeights};

    fn converged_after(deltas: &[PartialWeights]) -> (PersonalityWeights, ConvergedDimensions) {
        let checker = ConvergenceChecker::default();
        let mut weights = PersonalityWeights::zero();
        let mut converged = ConvergedDimensions::new();
        for delta in deltas {
            weights = update(&weights, delta);
            let scores = all_confidences(&weights);
            converged = checker.check_sticky(&weights, &scores, &converged);
        }
        (weights, converged)
    }

    #[test]
    fn test_no_data_never_converges() {
        let checker = ConvergenceChecker::new(0.0, 0.0);
        let weights = PersonalityWeights::zero();
        let converged = checker.check(&weights, &all_confidences(&weights));
        assert!(converged.is_empty());
    }

    #[test]
    fn test_guard_blocks_early_convergence() {
        let e = PartialWeights::new().with_mbti(MbtiLetter::E, 1.0);
        let (_, converged) = converged_after(&[e.clone(), e.clone()]);
        assert!(!converged.contains(Dimension::Mbti(MbtiAxis::EI)));
    }

    #[test]
    fn test_dominant_pair_converges() {
        let e = PartialWeights::new().with_mbti(MbtiLetter::E, 3.0);
        let (weights, converged) = converged_after(&[e.clone(), e.clone(), e]);
        assert_eq!(weights.mbti.e, 9.0);
        assert!(converged.contains(Dimension::Mbti(MbtiAxis::EI)));
        assert!(!converged.contains(Dimension::Mbti(MbtiAxis::SN)));
    }

    #[test]
    fn test_balanced_pair_does_not_converge() {
        let e = PartialWeights::new().with_mbti(MbtiLetter::E, 1.0);
        let i = PartialWeights::new().with_mbti(MbtiLetter::I, 1.0);
        let deltas: Vec<PartialWeights> = (0..10)
            .map(|n| if n % 2 == 0 { e.clone() } else { i.clone() })
            .collect();
        let (weights, converged) = converged_after(&deltas);
        assert_eq!(weights.mbti.e, 5.0);
        assert_eq!(weights.mbti.i, 5.0);
        assert!(!converged.contains(Dimension::Mbti(MbtiAxis::EI)));
    }

    #[test]
    fn test_convergence_is_sticky() {
        let e = PartialWeights::new().with_mbti(MbtiLetter::E, 3.0);
        let i = PartialWeights::new().with_mbti(MbtiLetter::I, 6.0);
        // E=6 converges, then I catches up to 6/6 which would un-converge a snapshot
        let (weights, converged) = converged_after(&[e.clone(), e, i]);
        assert_eq!(crate::core::axis_confidence(&weights, MbtiAxis::EI), 0.0);
        assert!(converged.contains(Dimension::Mbti(MbtiAxis::EI)));

        let checker = ConvergenceChecker::default();
        let snapshot = checker.check(&weights, &all_confidences(&weights));
        assert!(!snapshot.contains(Dimension::Mbti(MbtiAxis::EI)));
    }

    #[test]
    fn test_holland_letter_converges() {
        let inv = PartialWeights::new().with_holland(HollandCode::I, 3.0);
        let (_, converged) = converged_after(&[inv.clone(), inv]);
        assert!(converged.contains(Dimension::Holland(HollandCode::I)));
    }

    #[test]
    fn test_unobserved_holland_letters_stay_open() {
        let inv = PartialWeights::new().with_holland(HollandCode::I, 3.0);
        let (weights, converged) = converged_after(&[inv.clone(), inv]);
        assert_eq!(weights.holland.total(), 6.0);
        assert_eq!(converged.holland.len(), 1);
        for code in [HollandCode::R, HollandCode::A, HollandCode::S, HollandCode::E, HollandCode::C] {
            assert!(
                !converged.contains(Dimension::Holland(code)),
                "{} converged without evidence",
                code.as_char()
            );
        }
    }

    #[test]
    fn test_observed_weak_holland_letter_converges() {
        // R seen once, far below the rest
        let delta = PartialWeights::new()
            .with_holland(HollandCode::I, 10.0)
            .with_holland(HollandCode::R, 0.25);
        let (_, converged) = converged_after(&[delta]);
        assert!(converged.contains(Dimension::Holland(HollandCode::I)));
        assert!(converged.contains(Dimension::Holland(HollandCode::R)));
        assert!(!converged.contains(Dimension::Holland(HollandCode::A)));
    }

    #[test]
    fn test_missing_scores_are_computed() {
        let checker = ConvergenceChecker::default();
        let mut weights = PersonalityWeights::zero();
        weights.mbti.n = 8.0;
        let converged = checker.check(&weights, &BTreeMap::new());
        assert!(converged.contains(Dimension::Mbti(MbtiAxis::SN)));
    }
}
