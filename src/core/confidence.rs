//! Confidence scorer: how lopsided competing totals are
//!
//! MBTI axis:     |a - b| / (a + b)
//! Holland letter: |x - mean(others)| / (x + mean(others))
//!
//! Both yield 0.0 when nothing has been observed.

use std::collections::BTreeMap;

use crate::types::{Dimension, Domain, HollandCode, MbtiAxis, PersonalityWeights};

/// Lopsidedness of two non-negative totals, in [0, 1]
fn lopsidedness(a: f64, b: f64) -> f64 {
    let total = a + b;
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    ((a - b).abs() / total).clamp(0.0, 1.0)
}

/// Confidence for an MBTI pair
pub fn axis_confidence(weights: &PersonalityWeights, axis: MbtiAxis) -> f64 {
    lopsidedness(weights.mbti.get(axis.left()), weights.mbti.get(axis.right()))
}

/// Confidence for a Holland letter against the mean of the other five
pub fn holland_confidence(weights: &PersonalityWeights, code: HollandCode) -> f64 {
    let own = weights.holland.get(code);
    let others = HollandCode::ALL
        .iter()
        .filter(|c| **c != code)
        .map(|c| weights.holland.get(*c))
        .sum::<f64>()
        / (HollandCode::ALL.len() - 1) as f64;
    lopsidedness(own, others)
}

pub fn dimension_confidence(weights: &PersonalityWeights, dimension: Dimension) -> f64 {
    match dimension {
        Dimension::Mbti(axis) => axis_confidence(weights, axis),
        Dimension::Holland(code) => holland_confidence(weights, code),
    }
}

/// Confidence by label (`"E/I"`, `"R"`). Unknown labels score 0.0.
pub fn confidence(weights: &PersonalityWeights, label: &str, domain: Domain) -> f64 {
    Dimension::parse(label, domain)
        .map(|d| dimension_confidence(weights, d))
        .unwrap_or(0.0)
}

/// Confidence for all ten dimensions, keyed by label
pub fn all_confidences(weights: &PersonalityWeights) -> BTreeMap<String, f64> {
    Dimension::all()
        .map(|d| (d.label(), dimension_confidence(weights, d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights_with(e: f64, i: f64) -> PersonalityWeights {
        let mut w = PersonalityWeights::zero();
        w.mbti.e = e;
        w.mbti.i = i;
        w
    }

    #[test]
    fn test_no_data_is_zero() {
        let w = PersonalityWeights::zero();
        assert_eq!(confidence(&w, "E/I", Domain::Mbti), 0.0);
        assert_eq!(confidence(&w, "R", Domain::Holland), 0.0);
    }

    #[test]
    fn test_even_split_is_zero() {
        for v in [0.5, 1.0, 7.0, 1000.0] {
            assert_eq!(confidence(&weights_with(v, v), "E/I", Domain::Mbti), 0.0);
        }
    }

    #[test]
    fn test_one_sided_is_one() {
        assert_eq!(confidence(&weights_with(3.0, 0.0), "E/I", Domain::Mbti), 1.0);
        assert_eq!(confidence(&weights_with(0.0, 0.2), "E/I", Domain::Mbti), 1.0);
    }

    #[test]
    fn test_partial_lopsidedness() {
        let c = confidence(&weights_with(3.0, 1.0), "E/I", Domain::Mbti);
        assert!((c - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_label_order_does_not_matter() {
        let w = weights_with(3.0, 1.0);
        assert_eq!(
            confidence(&w, "E/I", Domain::Mbti),
            confidence(&w, "I/E", Domain::Mbti)
        );
    }

    #[test]
    fn test_unknown_label_is_zero() {
        let w = weights_with(3.0, 0.0);
        assert_eq!(confidence(&w, "E/X", Domain::Mbti), 0.0);
        assert_eq!(confidence(&w, "Z", Domain::Holland), 0.0);
    }

    #[test]
    fn test_holland_against_mean_of_others() {
        let mut w = PersonalityWeights::zero();
        w.holland.i = 6.0;
        w.holland.r = 5.0;
        // others of I: mean(5,0,0,0,0) = 1 → |6-1|/(6+1)
        let c = holland_confidence(&w, HollandCode::I);
        assert!((c - 5.0 / 7.0).abs() < 1e-12);

        // letter equal to the mean of the rest
        let mut flat = PersonalityWeights::zero();
        for code in HollandCode::ALL {
            *flat.holland.get_mut(code) = 2.0;
        }
        assert_eq!(holland_confidence(&flat, HollandCode::A), 0.0);
    }

    #[test]
    fn test_confidence_in_unit_interval() {
        let samples = [0.0, 0.001, 0.5, 1.0, 3.0, 99.0, 1e9];
        for &a in &samples {
            for &b in &samples {
                let mut w = weights_with(a, b);
                w.holland.s = a;
                w.holland.c = b;
                for (_, c) in all_confidences(&w) {
                    assert!((0.0..=1.0).contains(&c), "{} out of range for a={} b={}", c, a, b);
                }
            }
        }
    }

    #[test]
    fn test_all_confidences_has_every_label() {
        let scores = all_confidences(&PersonalityWeights::zero());
        assert_eq!(scores.len(), crate::TOTAL_DIMENSIONS);
        assert!(scores.contains_key("J/P"));
        assert!(scores.contains_key("C"));
    }
}
