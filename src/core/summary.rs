//! Final profile: MBTI code, Holland code, recommended departments

use crate::types::{
    AxisBreakdown, HollandCode, MbtiAxis, PersonalityWeights, ProfileSummary, Recommendation,
};

/// Department table keyed on the dominant Holland letter
const DEPARTMENTS: [(HollandCode, [(&str, u8); 3]); 6] = [
    (
        HollandCode::R,
        [
            ("Mechanical Engineering", 91),
            ("Civil Engineering", 88),
            ("Chemical Engineering", 85),
        ],
    ),
    (
        HollandCode::I,
        [
            ("Computer Science", 95),
            ("Mathematics", 90),
            ("Electrical Engineering", 88),
        ],
    ),
    (
        HollandCode::A,
        [("Design", 93), ("Fine Arts", 90), ("Architecture", 87)],
    ),
    (
        HollandCode::S,
        [("Education", 92), ("Psychology", 89), ("Social Work", 86)],
    ),
    (
        HollandCode::E,
        [
            ("Business Administration", 92),
            ("Communication", 88),
            ("Foreign Languages", 85),
        ],
    ),
    (
        HollandCode::C,
        [
            ("Accounting", 91),
            ("Finance", 88),
            ("Information Management", 86),
        ],
    ),
];

/// Winning letter of one axis. Ties go to the left letter (E, S, T, J).
fn axis_winner(weights: &PersonalityWeights, axis: MbtiAxis) -> AxisBreakdown {
    let left = weights.mbti.get(axis.left());
    let right = weights.mbti.get(axis.right());
    let total = left + right;

    let (winner, share) = if right > left {
        (axis.right(), right)
    } else {
        (axis.left(), left)
    };
    let percent = if total > 0.0 { share / total * 100.0 } else { 50.0 };

    AxisBreakdown {
        axis,
        winner,
        percent,
    }
}

/// Four-letter MBTI code
pub fn mbti_code(weights: &PersonalityWeights) -> String {
    MbtiAxis::ALL
        .iter()
        .map(|axis| axis_winner(weights, *axis).winner.as_char())
        .collect()
}

/// Holland letters ranked high to low, ties in RIASEC order
pub fn holland_ranking(weights: &PersonalityWeights) -> Vec<HollandCode> {
    let mut codes = HollandCode::ALL.to_vec();
    codes.sort_by(|a, b| weights.holland.get(*b).total_cmp(&weights.holland.get(*a)));
    codes
}

/// Top-three Holland code
pub fn holland_code(weights: &PersonalityWeights) -> String {
    holland_ranking(weights)
        .iter()
        .take(3)
        .map(HollandCode::as_char)
        .collect()
}

pub fn recommend_departments(dominant: HollandCode) -> Vec<Recommendation> {
    DEPARTMENTS
        .iter()
        .find(|(code, _)| *code == dominant)
        .map(|(_, list)| {
            list.iter()
                .map(|(name, match_percent)| Recommendation {
                    name: name.to_string(),
                    match_percent: *match_percent,
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn summarize(weights: &PersonalityWeights) -> ProfileSummary {
    let ranking = holland_ranking(weights);
    let dominant = ranking[0];

    ProfileSummary {
        mbti: mbti_code(weights),
        holland: holland_code(weights),
        dominant_interest: dominant,
        axes: MbtiAxis::ALL
            .iter()
            .map(|axis| axis_winner(weights, *axis))
            .collect(),
        recommendations: recommend_departments(dominant),
    }
}
