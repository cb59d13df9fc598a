//! Personality weight accumulators and sparse deltas

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One of the eight MBTI letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MbtiLetter {
    E,
    I,
    S,
    N,
    T,
    F,
    J,
    P,
}

impl MbtiLetter {
    pub const ALL: [MbtiLetter; 8] = [
        MbtiLetter::E,
        MbtiLetter::I,
        MbtiLetter::S,
        MbtiLetter::N,
        MbtiLetter::T,
        MbtiLetter::F,
        MbtiLetter::J,
        MbtiLetter::P,
    ];

    pub fn as_char(&self) -> char {
        match self {
            MbtiLetter::E => 'E',
            MbtiLetter::I => 'I',
            MbtiLetter::S => 'S',
            MbtiLetter::N => 'N',
            MbtiLetter::T => 'T',
            MbtiLetter::F => 'F',
            MbtiLetter::J => 'J',
            MbtiLetter::P => 'P',
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| s.len() == 1 && s.starts_with(l.as_char()))
    }
}

/// One of the six Holland (RIASEC) interest codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HollandCode {
    R,
    I,
    A,
    S,
    E,
    C,
}

impl HollandCode {
    /// Canonical RIASEC order, also used as the tie-break order
    pub const ALL: [HollandCode; 6] = [
        HollandCode::R,
        HollandCode::I,
        HollandCode::A,
        HollandCode::S,
        HollandCode::E,
        HollandCode::C,
    ];

    pub fn as_char(&self) -> char {
        match self {
            HollandCode::R => 'R',
            HollandCode::I => 'I',
            HollandCode::A => 'A',
            HollandCode::S => 'S',
            HollandCode::E => 'E',
            HollandCode::C => 'C',
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| s.len() == 1 && s.starts_with(c.as_char()))
    }

    /// Human-readable interest type
    pub fn name(&self) -> &'static str {
        match self {
            HollandCode::R => "Realistic",
            HollandCode::I => "Investigative",
            HollandCode::A => "Artistic",
            HollandCode::S => "Social",
            HollandCode::E => "Enterprising",
            HollandCode::C => "Conventional",
        }
    }
}

/// Running MBTI totals. Every letter is always present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MbtiWeights {
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "I")]
    pub i: f64,
    #[serde(rename = "S")]
    pub s: f64,
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "T")]
    pub t: f64,
    #[serde(rename = "F")]
    pub f: f64,
    #[serde(rename = "J")]
    pub j: f64,
    #[serde(rename = "P")]
    pub p: f64,
}

impl MbtiWeights {
    pub fn get(&self, letter: MbtiLetter) -> f64 {
        match letter {
            MbtiLetter::E => self.e,
            MbtiLetter::I => self.i,
            MbtiLetter::S => self.s,
            MbtiLetter::N => self.n,
            MbtiLetter::T => self.t,
            MbtiLetter::F => self.f,
            MbtiLetter::J => self.j,
            MbtiLetter::P => self.p,
        }
    }

    pub fn get_mut(&mut self, letter: MbtiLetter) -> &mut f64 {
        match letter {
            MbtiLetter::E => &mut self.e,
            MbtiLetter::I => &mut self.i,
            MbtiLetter::S => &mut self.s,
            MbtiLetter::N => &mut self.n,
            MbtiLetter::T => &mut self.t,
            MbtiLetter::F => &mut self.f,
            MbtiLetter::J => &mut self.j,
            MbtiLetter::P => &mut self.p,
        }
    }

    pub fn total(&self) -> f64 {
        MbtiLetter::ALL.iter().map(|l| self.get(*l)).sum()
    }
}

/// Running Holland totals. Every letter is always present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HollandWeights {
    #[serde(rename = "R")]
    pub r: f64,
    #[serde(rename = "I")]
    pub i: f64,
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "S")]
    pub s: f64,
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "C")]
    pub c: f64,
}

impl HollandWeights {
    pub fn get(&self, code: HollandCode) -> f64 {
        match code {
            HollandCode::R => self.r,
            HollandCode::I => self.i,
            HollandCode::A => self.a,
            HollandCode::S => self.s,
            HollandCode::E => self.e,
            HollandCode::C => self.c,
        }
    }

    pub fn get_mut(&mut self, code: HollandCode) -> &mut f64 {
        match code {
            HollandCode::R => &mut self.r,
            HollandCode::I => &mut self.i,
            HollandCode::A => &mut self.a,
            HollandCode::S => &mut self.s,
            HollandCode::E => &mut self.e,
            HollandCode::C => &mut self.c,
        }
    }

    pub fn total(&self) -> f64 {
        HollandCode::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// Accumulated evidence for all 14 letters.
///
/// Values only ever grow; the only way back to zero is an explicit reset
/// of the owning questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityWeights {
    pub mbti: MbtiWeights,
    pub holland: HollandWeights,
}

impl PersonalityWeights {
    /// All-zero weights
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Sparse delta carried by an answer option. Only affected keys are present.
///
/// Deserializes leniently through [`PartialWeights::from_value`], so a bad
/// key or amount in question JSON contributes nothing instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartialWeights {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub mbti: BTreeMap<MbtiLetter, f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub holland: BTreeMap<HollandCode, f64>,
}

impl PartialWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to an MBTI letter (builder style)
    pub fn with_mbti(mut self, letter: MbtiLetter, amount: f64) -> Self {
        *self.mbti.entry(letter).or_insert(0.0) += sanitize(amount);
        self
    }

    /// Add `amount` to a Holland letter (builder style)
    pub fn with_holland(mut self, code: HollandCode, amount: f64) -> Self {
        *self.holland.entry(code).or_insert(0.0) += sanitize(amount);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mbti.is_empty() && self.holland.is_empty()
    }

    /// Key-wise sum of two deltas
    pub fn merge(&self, other: &PartialWeights) -> PartialWeights {
        let mut merged = self.clone();
        for (letter, amount) in &other.mbti {
            *merged.mbti.entry(*letter).or_insert(0.0) += sanitize(*amount);
        }
        for (code, amount) in &other.holland {
            *merged.holland.entry(*code).or_insert(0.0) += sanitize(*amount);
        }
        merged
    }

    /// Lenient parse of `{"mbti": {...}, "holland": {...}}`.
    ///
    /// Unknown keys, non-numbers, negatives and non-finite values are dropped.
    pub fn from_value(value: &Value) -> Self {
        let mut delta = PartialWeights::new();

        if let Some(mbti) = value.get("mbti").and_then(Value::as_object) {
            for (key, raw) in mbti {
                if let (Some(letter), Some(amount)) = (MbtiLetter::parse(key), raw.as_f64()) {
                    if sanitize(amount) > 0.0 {
                        delta = delta.with_mbti(letter, amount);
                    }
                }
            }
        }

        if let Some(holland) = value.get("holland").and_then(Value::as_object) {
            for (key, raw) in holland {
                if let (Some(code), Some(amount)) = (HollandCode::parse(key), raw.as_f64()) {
                    if sanitize(amount) > 0.0 {
                        delta = delta.with_holland(code, amount);
                    }
                }
            }
        }

        delta
    }
}

impl<'de> Deserialize<'de> for PartialWeights {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Clamp a delta contribution to a finite, non-negative value
pub(crate) fn sanitize(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}
