use serde::{Deserialize, Serialize};

use super::{LearningStyle, Level};

pub const SUCCESS_STATUS: &str = "success";
const HEALTHY_STATUS: &str = "healthy";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumRequest {
    pub topic: String,
    pub level: Level,
    pub duration_weeks: u32,
    pub learning_style: LearningStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumResponse {
    #[serde(default)]
    pub curriculum: String,
    #[serde(default)]
    pub status: String,
}

impl CurriculumResponse {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_backend_field_names() {
        let request = CurriculumRequest {
            topic: "Rust".to_string(),
            level: Level::Intermediate,
            duration_weeks: 6,
            learning_style: LearningStyle::Visual,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "topic": "Rust",
                "level": "intermediate",
                "duration_weeks": 6,
                "learning_style": "visual",
            })
        );
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let response: CurriculumResponse = serde_json::from_value(json!({})).unwrap();
        assert!(!response.is_success());
        assert!(response.curriculum.is_empty());
    }
}
