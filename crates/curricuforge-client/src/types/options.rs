use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownChoice;

/// How much prior knowledge the learner brings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn all() -> &'static [Level] {
        &[Level::Beginner, Level::Intermediate, Level::Advanced]
    }

    /// Wire value sent to the generation service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::all()
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChoice::new("level", s))
    }
}

/// Preferred way of taking in new material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    Reading,
}

impl LearningStyle {
    pub fn all() -> &'static [LearningStyle] {
        &[
            LearningStyle::Visual,
            LearningStyle::Auditory,
            LearningStyle::Kinesthetic,
            LearningStyle::Reading,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "visual",
            LearningStyle::Auditory => "auditory",
            LearningStyle::Kinesthetic => "kinesthetic",
            LearningStyle::Reading => "reading",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningStyle {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LearningStyle::all()
            .iter()
            .copied()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChoice::new("learning_style", s))
    }
}
