pub mod models;
pub mod options;

use thiserror::Error;

pub use models::{CurriculumRequest, CurriculumResponse, HealthStatus, SUCCESS_STATUS};
pub use options::{LearningStyle, Level};

/// A select-style field received a value outside its known choices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field}: {value}")]
pub struct UnknownChoice {
    pub field: &'static str,
    pub value: String,
}

impl UnknownChoice {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}
