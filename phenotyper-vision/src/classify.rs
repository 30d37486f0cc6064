//! Anthropometric classification rules.
//!
//! Each classification is an ordered table of inclusive bands checked first
//! match wins, with a fallback label for values outside every band. The bands
//! are not a perfect partition: a face ratio strictly between 87.9 and 88.0,
//! or a nose ratio strictly inside (69.9, 70.0) or (84.9, 85.0), matches no
//! band and takes the fallback. Retuning any constant below can open or close
//! such gaps, so the boundary tests pin the current behaviour.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const FACE_EURYPROSOPIC_MIN: f64 = 88.0;
pub const FACE_MESOPROSOPIC_MIN: f64 = 84.0;
// Must stay below FACE_EURYPROSOPIC_MIN or the middle band becomes unreachable.
pub const FACE_MESOPROSOPIC_MAX: f64 = 87.9;

pub const NOSE_LEPTORHINE_MAX: f64 = 69.9;
pub const NOSE_MESORHINE_MIN: f64 = 70.0;
pub const NOSE_MESORHINE_MAX: f64 = 84.9;
pub const NOSE_CHAMAERHINE_MIN: f64 = 85.0;
pub const NOSE_CHAMAERHINE_MAX: f64 = 99.0;

pub const JAW_NARROW_REF: f64 = 0.7303;
pub const JAW_WIDE_REF: f64 = 0.8943;
pub const JAW_MARGIN: f64 = 0.05;
pub const JAW_NARROW_BOUND: f64 = JAW_NARROW_REF + JAW_MARGIN;
pub const JAW_WIDE_BOUND: f64 = JAW_WIDE_REF - JAW_MARGIN;

pub const LIP_THIN_REF: f64 = 0.0977;
pub const LIP_THICK_REF: f64 = 0.1989;
pub const LIP_MARGIN: f64 = 0.02;
pub const LIP_THIN_BOUND: f64 = LIP_THIN_REF + LIP_MARGIN;
pub const LIP_THICK_BOUND: f64 = LIP_THICK_REF - LIP_MARGIN;

/// Inclusive value range of a rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtMost(f64),
    AtLeast(f64),
    Within(f64, f64),
}

impl Bound {
    pub fn contains(self, value: f64) -> bool {
        match self {
            Bound::AtMost(max) => value <= max,
            Bound::AtLeast(min) => value >= min,
            Bound::Within(min, max) => min <= value && value <= max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule<L> {
    pub bound: Bound,
    pub label: L,
}

/// Ordered rules; the first containing band wins, otherwise `fallback`.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable<L, const N: usize> {
    rules: [Rule<L>; N],
    fallback: L,
}

impl<L: Copy, const N: usize> RuleTable<L, N> {
    pub const fn new(rules: [Rule<L>; N], fallback: L) -> Self {
        Self { rules, fallback }
    }

    pub fn classify(&self, value: f64) -> L {
        self.rules
            .iter()
            .find(|rule| rule.bound.contains(value))
            .map_or(self.fallback, |rule| rule.label)
    }

    pub fn rules(&self) -> &[Rule<L>] {
        &self.rules
    }

    pub fn fallback(&self) -> L {
        self.fallback
    }
}

pub const FACE_RULES: RuleTable<FaceType, 2> = RuleTable::new(
    [
        Rule {
            bound: Bound::AtLeast(FACE_EURYPROSOPIC_MIN),
            label: FaceType::Euryprosopic,
        },
        Rule {
            bound: Bound::Within(FACE_MESOPROSOPIC_MIN, FACE_MESOPROSOPIC_MAX),
            label: FaceType::Mesoprosopic,
        },
    ],
    FaceType::Leptoprosopic,
);

pub const NOSE_RULES: RuleTable<NoseType, 3> = RuleTable::new(
    [
        Rule {
            bound: Bound::AtMost(NOSE_LEPTORHINE_MAX),
            label: NoseType::Leptorhine,
        },
        Rule {
            bound: Bound::Within(NOSE_MESORHINE_MIN, NOSE_MESORHINE_MAX),
            label: NoseType::Mesorhine,
        },
        Rule {
            bound: Bound::Within(NOSE_CHAMAERHINE_MIN, NOSE_CHAMAERHINE_MAX),
            label: NoseType::Chamaerhine,
        },
    ],
    NoseType::OutOfRange,
);

// Narrow is checked before wide.
pub const JAW_RULES: RuleTable<JawType, 2> = RuleTable::new(
    [
        Rule {
            bound: Bound::AtMost(JAW_NARROW_BOUND),
            label: JawType::Narrow,
        },
        Rule {
            bound: Bound::AtLeast(JAW_WIDE_BOUND),
            label: JawType::Wide,
        },
    ],
    JawType::Average,
);

pub const LIP_RULES: RuleTable<LipType, 2> = RuleTable::new(
    [
        Rule {
            bound: Bound::AtMost(LIP_THIN_BOUND),
            label: LipType::Thin,
        },
        Rule {
            bound: Bound::AtLeast(LIP_THICK_BOUND),
            label: LipType::Thick,
        },
    ],
    LipType::Average,
);

pub fn classify_face(ratio_pct: f64) -> FaceType {
    FACE_RULES.classify(ratio_pct)
}

pub fn classify_nose(ratio_pct: f64) -> NoseType {
    NOSE_RULES.classify(ratio_pct)
}

pub fn classify_jaw(width_norm: f64) -> JawType {
    JAW_RULES.classify(width_norm)
}

pub fn classify_lip(length_norm: f64) -> LipType {
    LIP_RULES.classify(length_norm)
}

/// Language used when rendering labels for people.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceType {
    #[serde(rename = "euryprosopic")]
    Euryprosopic,
    #[serde(rename = "mesoprosopic")]
    Mesoprosopic,
    #[serde(rename = "leptoprosopic")]
    Leptoprosopic,
}

impl FaceType {
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (FaceType::Euryprosopic, Locale::En) => "euryprosopic",
            (FaceType::Mesoprosopic, Locale::En) => "mesoprosopic",
            (FaceType::Leptoprosopic, Locale::En) => "leptoprosopic",
            (FaceType::Euryprosopic, Locale::Ru) => "Юрипросопия",
            (FaceType::Mesoprosopic, Locale::Ru) => "Мезопросопия",
            (FaceType::Leptoprosopic, Locale::Ru) => "Лепторосопия",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoseType {
    #[serde(rename = "leptorhine")]
    Leptorhine,
    #[serde(rename = "mesorhine")]
    Mesorhine,
    #[serde(rename = "chamaerhine")]
    Chamaerhine,
    /// Wider than the chamaerhine band, or inside a gap between bands.
    #[serde(rename = "out of range (>99%)")]
    OutOfRange,
}

impl NoseType {
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (NoseType::Leptorhine, Locale::En) => "leptorhine",
            (NoseType::Mesorhine, Locale::En) => "mesorhine",
            (NoseType::Chamaerhine, Locale::En) => "chamaerhine",
            (NoseType::OutOfRange, Locale::En) => "out of range (>99%)",
            (NoseType::Leptorhine, Locale::Ru) => "Лепториния",
            (NoseType::Mesorhine, Locale::Ru) => "Мизориния",
            (NoseType::Chamaerhine, Locale::Ru) => "Хамэриния",
            (NoseType::OutOfRange, Locale::Ru) => "вне диапазона (>99%)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JawType {
    #[serde(rename = "narrow jaw")]
    Narrow,
    #[serde(rename = "average jaw")]
    Average,
    #[serde(rename = "wide jaw")]
    Wide,
}

impl JawType {
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (JawType::Narrow, Locale::En) => "narrow jaw",
            (JawType::Average, Locale::En) => "average jaw",
            (JawType::Wide, Locale::En) => "wide jaw",
            (JawType::Narrow, Locale::Ru) => "Узкая челюсть",
            (JawType::Average, Locale::Ru) => "Средняя челюсть",
            (JawType::Wide, Locale::Ru) => "Широкая челюсть",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LipType {
    #[serde(rename = "thin lips")]
    Thin,
    #[serde(rename = "average lips")]
    Average,
    #[serde(rename = "thick lips")]
    Thick,
}

impl LipType {
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (LipType::Thin, Locale::En) => "thin lips",
            (LipType::Average, Locale::En) => "average lips",
            (LipType::Thick, Locale::En) => "thick lips",
            (LipType::Thin, Locale::Ru) => "Тонкие губы",
            (LipType::Average, Locale::Ru) => "Средние губы",
            (LipType::Thick, Locale::Ru) => "Толстые губы",
        }
    }
}

macro_rules! display_canonical {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label(Locale::En))
                }
            }
        )*
    };
}

display_canonical!(FaceType, NoseType, JawType, LipType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_boundaries() {
        assert_eq!(classify_face(88.0), FaceType::Euryprosopic);
        assert_eq!(classify_face(120.0), FaceType::Euryprosopic);
        assert_eq!(classify_face(87.9), FaceType::Mesoprosopic);
        assert_eq!(classify_face(84.0), FaceType::Mesoprosopic);
        assert_eq!(classify_face(83.9), FaceType::Leptoprosopic);
        assert_eq!(classify_face(0.0), FaceType::Leptoprosopic);
    }

    fn lower_edge(bound: Bound) -> f64 {
        match bound {
            Bound::AtMost(_) => f64::NEG_INFINITY,
            Bound::AtLeast(min) | Bound::Within(min, _) => min,
        }
    }

    #[test]
    fn nose_bands_ascend_without_overlap() {
        let rules = NOSE_RULES.rules();
        for pair in rules.windows(2) {
            let upper = match pair[0].bound {
                Bound::AtMost(max) | Bound::Within(_, max) => max,
                Bound::AtLeast(_) => f64::INFINITY,
            };
            assert!(upper < lower_edge(pair[1].bound), "{:?} overlaps {:?}", pair[0], pair[1]);
        }
        assert_eq!(NOSE_RULES.fallback(), NoseType::OutOfRange);
    }

    #[test]
    fn every_rule_classifies_its_own_band() {
        for rule in FACE_RULES.rules() {
            let edge = match rule.bound {
                Bound::AtMost(max) => max,
                Bound::AtLeast(min) | Bound::Within(min, _) => min,
            };
            assert_eq!(FACE_RULES.classify(edge), rule.label);
        }
        for rule in NOSE_RULES.rules() {
            assert_eq!(NOSE_RULES.classify(lower_edge(rule.bound).max(0.0)), rule.label);
        }
        assert_eq!(FACE_RULES.fallback(), FaceType::Leptoprosopic);
        assert_eq!(JAW_RULES.fallback(), JawType::Average);
        assert_eq!(LIP_RULES.fallback(), LipType::Average);
    }

    #[test]
    fn face_gap_below_euryprosopic_falls_back() {
        assert_eq!(classify_face(87.95), FaceType::Leptoprosopic);
    }

    #[test]
    fn nose_boundaries() {
        assert_eq!(classify_nose(0.0), NoseType::Leptorhine);
        assert_eq!(classify_nose(69.9), NoseType::Leptorhine);
        assert_eq!(classify_nose(70.0), NoseType::Mesorhine);
        assert_eq!(classify_nose(84.9), NoseType::Mesorhine);
        assert_eq!(classify_nose(85.0), NoseType::Chamaerhine);
        assert_eq!(classify_nose(99.0), NoseType::Chamaerhine);
        assert_eq!(classify_nose(99.1), NoseType::OutOfRange);
    }

    #[test]
    fn nose_gaps_fall_back_to_out_of_range() {
        assert_eq!(classify_nose(69.95), NoseType::OutOfRange);
        assert_eq!(classify_nose(84.95), NoseType::OutOfRange);
    }

    #[test]
    fn out_of_range_label_names_the_threshold() {
        let expected = format!("out of range (>{NOSE_CHAMAERHINE_MAX:.0}%)");
        assert_eq!(NoseType::OutOfRange.to_string(), expected);
        assert!(NoseType::OutOfRange.to_string().contains("99"));
        assert_eq!(
            serde_json::to_string(&NoseType::OutOfRange).unwrap(),
            format!("\"{expected}\"")
        );
    }

    #[test]
    fn jaw_boundaries() {
        assert!(JAW_NARROW_BOUND < JAW_WIDE_BOUND);
        assert_eq!(classify_jaw(0.7803), JawType::Narrow);
        assert_eq!(classify_jaw(0.8443), JawType::Wide);
        assert_eq!(classify_jaw(0.80), JawType::Average);
        assert_eq!(classify_jaw(0.0), JawType::Narrow);
    }

    #[test]
    fn lip_boundaries() {
        assert!(LIP_THIN_BOUND < LIP_THICK_BOUND);
        assert_eq!(classify_lip(0.1177), LipType::Thin);
        assert_eq!(classify_lip(0.1789), LipType::Thick);
        assert_eq!(classify_lip(0.15), LipType::Average);
        assert_eq!(classify_lip(0.0), LipType::Thin);
    }

    #[test]
    fn first_matching_rule_wins() {
        let overlapping = RuleTable::new(
            [
                Rule {
                    bound: Bound::AtMost(10.0),
                    label: "low",
                },
                Rule {
                    bound: Bound::Within(5.0, 20.0),
                    label: "mid",
                },
            ],
            "other",
        );
        assert_eq!(overlapping.classify(7.0), "low");
        assert_eq!(overlapping.classify(15.0), "mid");
        assert_eq!(overlapping.classify(25.0), "other");
    }

    #[test]
    fn russian_labels() {
        assert_eq!(FaceType::Euryprosopic.label(Locale::Ru), "Юрипросопия");
        assert_eq!(NoseType::Mesorhine.label(Locale::Ru), "Мизориния");
        assert_eq!(JawType::Wide.label(Locale::Ru), "Широкая челюсть");
        assert_eq!(LipType::Average.label(Locale::Ru), "Средние губы");
    }

    #[test]
    fn labels_serialize_canonically() {
        assert_eq!(
            serde_json::to_string(&JawType::Average).unwrap(),
            "\"average jaw\""
        );
        let lip: LipType = serde_json::from_str("\"thick lips\"").unwrap();
        assert_eq!(lip, LipType::Thick);
    }
}
