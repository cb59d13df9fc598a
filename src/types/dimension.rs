//! Dimension labels: the four MBTI axes and the six Holland letters

use serde::{Deserialize, Serialize};

use crate::types::{HollandCode, MbtiLetter};

/// Which typing system a label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Mbti,
    Holland,
}

/// One of the four competing MBTI letter pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MbtiAxis {
    #[serde(rename = "E/I")]
    EI,
    #[serde(rename = "S/N")]
    SN,
    #[serde(rename = "T/F")]
    TF,
    #[serde(rename = "J/P")]
    JP,
}

impl MbtiAxis {
    pub const ALL: [MbtiAxis; 4] = [MbtiAxis::EI, MbtiAxis::SN, MbtiAxis::TF, MbtiAxis::JP];

    /// Left letter; also the tie-break default
    pub fn left(&self) -> MbtiLetter {
        match self {
            MbtiAxis::EI => MbtiLetter::E,
            MbtiAxis::SN => MbtiLetter::S,
            MbtiAxis::TF => MbtiLetter::T,
            MbtiAxis::JP => MbtiLetter::J,
        }
    }

    pub fn right(&self) -> MbtiLetter {
        match self {
            MbtiAxis::EI => MbtiLetter::I,
            MbtiAxis::SN => MbtiLetter::N,
            MbtiAxis::TF => MbtiLetter::F,
            MbtiAxis::JP => MbtiLetter::P,
        }
    }

    /// Axis a letter sits on
    pub fn of(letter: MbtiLetter) -> MbtiAxis {
        match letter {
            MbtiLetter::E | MbtiLetter::I => MbtiAxis::EI,
            MbtiLetter::S | MbtiLetter::N => MbtiAxis::SN,
            MbtiLetter::T | MbtiLetter::F => MbtiAxis::TF,
            MbtiLetter::J | MbtiLetter::P => MbtiAxis::JP,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MbtiAxis::EI => "E/I",
            MbtiAxis::SN => "S/N",
            MbtiAxis::TF => "T/F",
            MbtiAxis::JP => "J/P",
        }
    }

    /// Parse `"E/I"`. The pair must match a known axis in either order.
    pub fn parse(label: &str) -> Option<Self> {
        let (left, right) = label.split_once('/')?;
        let left = MbtiLetter::parse(left.trim())?;
        let right = MbtiLetter::parse(right.trim())?;
        let axis = MbtiAxis::of(left);
        if left == right || MbtiAxis::of(right) != axis {
            return None;
        }
        Some(axis)
    }
}

impl std::fmt::Display for MbtiAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single convergence target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Mbti(MbtiAxis),
    Holland(HollandCode),
}

impl Dimension {
    /// All ten dimensions, MBTI axes first
    pub fn all() -> impl Iterator<Item = Dimension> {
        MbtiAxis::ALL
            .into_iter()
            .map(Dimension::Mbti)
            .chain(HollandCode::ALL.into_iter().map(Dimension::Holland))
    }

    pub fn label(&self) -> String {
        match self {
            Dimension::Mbti(axis) => axis.label().to_string(),
            Dimension::Holland(code) => code.as_char().to_string(),
        }
    }

    pub fn parse(label: &str, domain: Domain) -> Option<Self> {
        match domain {
            Domain::Mbti => MbtiAxis::parse(label).map(Dimension::Mbti),
            Domain::Holland => HollandCode::parse(label.trim()).map(Dimension::Holland),
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_parse() {
        assert_eq!(MbtiAxis::parse("E/I"), Some(MbtiAxis::EI));
        assert_eq!(MbtiAxis::parse("I/E"), Some(MbtiAxis::EI));
        assert_eq!(MbtiAxis::parse("J / P"), Some(MbtiAxis::JP));
        assert_eq!(MbtiAxis::parse("E/N"), None);
        assert_eq!(MbtiAxis::parse("E/E"), None);
        assert_eq!(MbtiAxis::parse("EI"), None);
    }

    #[test]
    fn test_axis_serializes_as_label() {
        let json = serde_json::to_string(&MbtiAxis::TF).unwrap();
        assert_eq!(json, "\"T/F\"");
        let axis: MbtiAxis = serde_json::from_str("\"S/N\"").unwrap();
        assert_eq!(axis, MbtiAxis::SN);
    }

    #[test]
    fn test_dimension_labels() {
        let labels: Vec<String> = Dimension::all().map(|d| d.label()).collect();
        assert_eq!(
            labels,
            vec!["E/I", "S/N", "T/F", "J/P", "R", "I", "A", "S", "E", "C"]
        );
    }

    #[test]
    fn test_dimension_parse_respects_domain() {
        assert_eq!(
            Dimension::parse("I", Domain::Holland),
            Some(Dimension::Holland(HollandCode::I))
        );
        assert_eq!(Dimension::parse("I", Domain::Mbti), None);
        assert_eq!(Dimension::parse("E/I", Domain::Holland), None);
    }
}
