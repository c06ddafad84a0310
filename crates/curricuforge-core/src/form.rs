use curricuforge_client::{CurriculumRequest, LearningStyle, Level, UnknownChoice};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all fields")]
    Incomplete,
    #[error("invalid {field}: {value}")]
    InvalidChoice { field: &'static str, value: String },
}

impl From<UnknownChoice> for FormError {
    fn from(choice: UnknownChoice) -> Self {
        FormError::InvalidChoice {
            field: choice.field,
            value: choice.value,
        }
    }
}

/// Raw field values as entered, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumForm {
    pub topic: String,
    pub level: String,
    pub duration_weeks: String,
    pub learning_style: String,
}

impl CurriculumForm {
    pub fn new(
        topic: impl Into<String>,
        level: impl Into<String>,
        duration_weeks: impl Into<String>,
        learning_style: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            level: level.into(),
            duration_weeks: duration_weeks.into(),
            learning_style: learning_style.into(),
        }
    }

    /// Turns the raw fields into a request.
    ///
    /// Any blank field, or a week count that is not a positive integer, is
    /// [`FormError::Incomplete`]. The trimmed week count must parse as a whole
    /// unsigned number, so `"12abc"` and `"-3"` are rejected rather than read
    /// as a leading number. Only the topic is trimmed before it is sent.
    pub fn validate(&self) -> Result<CurriculumRequest, FormError> {
        let topic = self.topic.trim();
        let level = self.level.trim();
        let learning_style = self.learning_style.trim();
        let duration_weeks = self
            .duration_weeks
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|weeks| *weeks > 0);

        let Some(duration_weeks) = duration_weeks else {
            return Err(FormError::Incomplete);
        };
        if topic.is_empty() || level.is_empty() || learning_style.is_empty() {
            return Err(FormError::Incomplete);
        }

        Ok(CurriculumRequest {
            topic: topic.to_string(),
            level: level.parse::<Level>()?,
            duration_weeks,
            learning_style: learning_style.parse::<LearningStyle>()?,
        })
    }
}
