//! Weight updater: merge a selected option's delta into the running totals

use crate::types::{sanitize, PartialWeights, PersonalityWeights};

/// Add `delta` onto `current` and return the result.
///
/// Keys absent from `delta` are copied unchanged. Negative or non-finite
/// contributions count as zero, so accumulators never decrease.
pub fn update(current: &PersonalityWeights, delta: &PartialWeights) -> PersonalityWeights {
    let mut next = *current;

    for (letter, amount) in &delta.mbti {
        *next.mbti.get_mut(*letter) += sanitize(*amount);
    }
    for (code, amount) in &delta.holland {
        *next.holland.get_mut(*code) += sanitize(*amount);
    }

    next
}
