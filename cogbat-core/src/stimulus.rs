use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::adaptive::AdaptiveState;

/// Produces the stimulus for one trial.
///
/// Implementations must be pure given the random source and the adaptive
/// state carried by the context: the same rng state and context yield the
/// same `TrialSpec`.
pub trait StimulusGenerator: Send + Sync + fmt::Debug {
    fn generate(&self, ctx: &TrialContext<'_>, rng: &mut dyn RngCore) -> TrialSpec;
}

/// What a generator may look at when building the next stimulus.
#[derive(Debug, Clone, Copy)]
pub struct TrialContext<'a> {
    /// Zero-based index of the trial about to be presented.
    pub index: usize,
    pub state: &'a AdaptiveState,
}

/// Recall direction for sequence tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowDirection {
    Left,
    Right,
}

impl ArrowDirection {
    pub fn glyph(&self) -> char {
        match self {
            ArrowDirection::Left => '←',
            ArrowDirection::Right => '→',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArrowDirection::Left => "left",
            ArrowDirection::Right => "right",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            ArrowDirection::Left => ArrowDirection::Right,
            ArrowDirection::Right => ArrowDirection::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Color {
    /// Ink palette and word vocabulary of the Stroop task.
    pub const STROOP: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];
    /// Card colors of the sorting task.
    pub const CARDS: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    pub fn label(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
        }
    }

    /// Upper-case color name as printed on a Stroop card.
    pub fn word(&self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Green => "GREEN",
            Color::Blue => "BLUE",
            Color::Yellow => "YELLOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Circle,
    Triangle,
    Square,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Circle, Shape::Triangle, Shape::Square];

    pub fn label(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Triangle => "triangle",
            Shape::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub color: Color,
    pub shape: Shape,
}

impl Card {
    pub fn new(color: Color, shape: Shape) -> Self {
        Self { color, shape }
    }

    /// Value of the attribute the rule sorts by.
    pub fn attribute(&self, rule: SortRule) -> &'static str {
        match rule {
            SortRule::Color => self.color.label(),
            SortRule::Shape => self.shape.label(),
        }
    }

    pub fn matches(&self, other: &Card, rule: SortRule) -> bool {
        match rule {
            SortRule::Color => self.color == other.color,
            SortRule::Shape => self.shape == other.shape,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color.label(), self.shape.label())
    }
}

/// Attribute used to judge a card match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortRule {
    Color,
    Shape,
}

impl SortRule {
    pub fn label(&self) -> &'static str {
        match self {
            SortRule::Color => "color",
            SortRule::Shape => "shape",
        }
    }

    pub fn switched(&self) -> Self {
        match self {
            SortRule::Color => SortRule::Shape,
            SortRule::Shape => SortRule::Color,
        }
    }
}

/// The generated stimulus of one trial. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrialSpec {
    Digits {
        digits: Vec<u8>,
        direction: Direction,
    },
    Arrows {
        arrows: Vec<ArrowDirection>,
    },
    ColorWord {
        word: Color,
        ink: Color,
    },
    Card {
        target: Card,
        options: Vec<Card>,
        /// Rule active when the trial was generated; scoring uses only this.
        rule: SortRule,
    },
    Words {
        words: Vec<String>,
    },
}

impl TrialSpec {
    /// Number of symbols presented.
    pub fn size(&self) -> usize {
        match self {
            TrialSpec::Digits { digits, .. } => digits.len(),
            TrialSpec::Arrows { arrows } => arrows.len(),
            TrialSpec::ColorWord { .. } | TrialSpec::Card { .. } => 1,
            TrialSpec::Words { words } => words.len(),
        }
    }

    /// The answer a participant has to give, in normalized form.
    pub fn expected_answer(&self) -> String {
        match self {
            TrialSpec::Digits { digits, direction } => {
                let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
                match direction {
                    Direction::Forward => text,
                    Direction::Backward => text.chars().rev().collect(),
                }
            }
            TrialSpec::Arrows { .. } => self
                .target_arrow()
                .map(|a| a.label().to_string())
                .unwrap_or_default(),
            TrialSpec::ColorWord { ink, .. } => ink.label().to_string(),
            TrialSpec::Card { target, rule, .. } => {
                format!("{}={}", rule.label(), target.attribute(*rule))
            }
            TrialSpec::Words { words } => words.join(" "),
        }
    }

    /// Experimental condition tag for the trial row.
    pub fn condition(&self) -> String {
        match self {
            TrialSpec::Digits { direction, .. } => direction.label().to_string(),
            TrialSpec::Arrows { arrows } => {
                let congruent = self
                    .target_arrow()
                    .is_some_and(|target| arrows.iter().all(|a| *a == target));
                congruency(congruent).to_string()
            }
            TrialSpec::ColorWord { word, ink } => congruency(word == ink).to_string(),
            TrialSpec::Card { rule, .. } => format!("rule={}", rule.label()),
            TrialSpec::Words { words } => format!("list={}", words.len()),
        }
    }

    pub fn target_arrow(&self) -> Option<ArrowDirection> {
        match self {
            TrialSpec::Arrows { arrows } => arrows.get(arrows.len() / 2).copied(),
            _ => None,
        }
    }
}

fn congruency(congruent: bool) -> &'static str {
    if congruent { "congruent" } else { "incongruent" }
}

impl fmt::Display for TrialSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialSpec::Digits { digits, .. } => {
                let parts: Vec<String> = digits.iter().map(|d| d.to_string()).collect();
                write!(f, "{}", parts.join(" "))
            }
            TrialSpec::Arrows { arrows } => {
                let row: String = arrows.iter().map(|a| a.glyph()).collect();
                write!(f, "{row}")
            }
            TrialSpec::ColorWord { word, ink } => write!(f, "{} in {}", word.word(), ink.label()),
            TrialSpec::Card {
                target, options, ..
            } => {
                let choices: Vec<String> = options.iter().map(|c| c.to_string()).collect();
                write!(f, "{target} -> [{}]", choices.join(" | "))
            }
            TrialSpec::Words { words } => write!(f, "{}", words.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backward_digits_expect_reversed_string() {
        let spec = TrialSpec::Digits {
            digits: vec![4, 1, 7],
            direction: Direction::Backward,
        };
        assert_eq!(spec.expected_answer(), "714");
        assert_eq!(spec.to_string(), "4 1 7");
        assert_eq!(spec.condition(), "backward");
    }

    #[test]
    fn flanker_target_is_middle_arrow() {
        use ArrowDirection::*;
        let spec = TrialSpec::Arrows {
            arrows: vec![Right, Right, Left, Right, Right],
        };
        assert_eq!(spec.target_arrow(), Some(Left));
        assert_eq!(spec.expected_answer(), "left");
        assert_eq!(spec.condition(), "incongruent");
        assert_eq!(spec.to_string(), "→→←→→");
    }

    #[test]
    fn stroop_expects_ink_not_word() {
        let spec = TrialSpec::ColorWord {
            word: Color::Red,
            ink: Color::Blue,
        };
        assert_eq!(spec.expected_answer(), "blue");
        assert_eq!(spec.condition(), "incongruent");

        let same = TrialSpec::ColorWord {
            word: Color::Green,
            ink: Color::Green,
        };
        assert_eq!(same.condition(), "congruent");
    }

    #[test]
    fn card_expectation_names_snapshot_rule() {
        let spec = TrialSpec::Card {
            target: Card::new(Color::Red, Shape::Square),
            options: vec![Card::new(Color::Blue, Shape::Square)],
            rule: SortRule::Shape,
        };
        assert_eq!(spec.expected_answer(), "shape=square");
        assert_eq!(spec.size(), 1);
    }

    #[test]
    fn spec_serializes_with_kind_tag() {
        let spec = TrialSpec::Words {
            words: vec!["river".into(), "candle".into()],
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "words");
    }
}
