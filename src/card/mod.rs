//! Card and attribute types
//!
//! A card is an immutable triple of color, shape and count. Each attribute
//! has four possible values; rules name the attribute that decides whether
//! two cards belong together.

mod generator;

pub use generator::*;

use crate::error::{CardSortError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of values each attribute can take
pub const ATTRIBUTE_VALUES: usize = 4;

/// Card color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    pub const ALL: [Color; ATTRIBUTE_VALUES] = [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
        }
    }
}

impl FromStr for Color {
    type Err = CardSortError;

    fn from_str(s: &str) -> Result<Self> {
        Color::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CardSortError::DeserializationError(format!("Unknown color: {}", s)))
    }
}

/// Card shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Triangle,
    Star,
    Cross,
    Circle,
}

impl Shape {
    pub const ALL: [Shape; ATTRIBUTE_VALUES] =
        [Shape::Triangle, Shape::Star, Shape::Cross, Shape::Circle];

    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Triangle => "triangle",
            Shape::Star => "star",
            Shape::Cross => "cross",
            Shape::Circle => "circle",
        }
    }
}

impl FromStr for Shape {
    type Err = CardSortError;

    fn from_str(s: &str) -> Result<Self> {
        Shape::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CardSortError::DeserializationError(format!("Unknown shape: {}", s)))
    }
}

/// Number of symbols printed on a card (1 to 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Count(u8);

impl Count {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = ATTRIBUTE_VALUES as u8;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Count(value))
        } else {
            Err(CardSortError::DeserializationError(format!(
                "Count must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Count {
    type Error = CardSortError;

    fn try_from(value: u8) -> Result<Self> {
        Count::new(value)
    }
}

impl From<Count> for u8 {
    fn from(count: Count) -> u8 {
        count.0
    }
}

/// Classification rule: the attribute that currently defines a correct match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    Color,
    Shape,
    #[serde(alias = "number")]
    Count,
}

impl Rule {
    /// Scan order used when looking for the dimension two cards agree on
    pub const PRIORITY: [Rule; 3] = [Rule::Color, Rule::Shape, Rule::Count];

    pub fn as_str(self) -> &'static str {
        match self {
            Rule::Color => "color",
            Rule::Shape => "shape",
            Rule::Count => "count",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rule {
    type Err = CardSortError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "color" | "colour" => Ok(Rule::Color),
            "shape" => Ok(Rule::Shape),
            "count" | "number" => Ok(Rule::Count),
            _ => Err(CardSortError::DeserializationError(format!(
                "Unknown rule: {}",
                s
            ))),
        }
    }
}

/// An immutable stimulus or reference card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub color: Color,
    pub shape: Shape,
    pub count: Count,
}

impl Card {
    #[inline]
    pub fn new(color: Color, shape: Shape, count: Count) -> Self {
        Self { color, shape, count }
    }

    /// Whether both cards share the attribute named by `rule`
    #[inline]
    pub fn agrees_on(&self, other: &Card, rule: Rule) -> bool {
        match rule {
            Rule::Color => self.color == other.color,
            Rule::Shape => self.shape == other.shape,
            Rule::Count => self.count == other.count,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} x{}",
            self.color.as_str(),
            self.shape.as_str(),
            self.count.get()
        )
    }
}

/// The four standard reference cards, distinct in every attribute
pub fn default_reference_cards() -> [Card; ATTRIBUTE_VALUES] {
    [
        Card::new(Color::Red, Shape::Triangle, Count(1)),
        Card::new(Color::Green, Shape::Star, Count(2)),
        Card::new(Color::Yellow, Shape::Cross, Count(3)),
        Card::new(Color::Blue, Shape::Circle, Count(4)),
    ]
}
