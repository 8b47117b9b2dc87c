//! Request and response DTOs for the lesson deck endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::handlers::lesson::{DeckPackage, DeckPreview};
use crate::domain::lesson::{LessonError, LessonRequestInput};

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/generate-presentation`.
///
/// Numeric fields accept numbers or numeric strings; anything else falls back
/// to the default when the request is validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDeckRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub slide_count: Option<Value>,
    #[serde(default, alias = "teacherAge")]
    pub presenter_age: Option<Value>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub area_type: Option<String>,
    #[serde(default)]
    pub teaching_method: Option<String>,
    #[serde(default)]
    pub student_context: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl GenerateDeckRequest {
    pub fn into_input(self) -> LessonRequestInput {
        LessonRequestInput {
            topic: self.topic,
            grade: self.grade,
            slide_count: lenient_integer(self.slide_count.as_ref()),
            presenter_age: lenient_integer(self.presenter_age.as_ref()),
            region: self.region,
            area_type: self.area_type,
            teaching_method: self.teaching_method,
            student_context: self.student_context,
            language: self.language,
        }
    }
}

/// Reads an integer from a JSON number or a numeric string.
pub fn lenient_integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
        }
        _ => None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

/// Successful deck generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDeckResponse {
    pub success: bool,
    pub file_name: String,
    pub file_data: String,
    pub mime_type: String,
    pub preview: DeckPreview,
}

impl From<DeckPackage> for GenerateDeckResponse {
    fn from(package: DeckPackage) -> Self {
        Self {
            success: true,
            file_name: package.file_name,
            file_data: package.file_data,
            mime_type: package.mime_type,
            preview: package.preview,
        }
    }
}

/// Liveness and configuration flags.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub text_generation_configured: bool,
    pub image_service_configured: bool,
}

/// Structured failure body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}

impl From<&LessonError> for ErrorResponse {
    fn from(error: &LessonError) -> Self {
        Self::new(error.code(), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        assert_eq!(lenient_integer(Some(&json!(4))), Some(4));
        assert_eq!(lenient_integer(Some(&json!("12"))), Some(12));
        assert_eq!(lenient_integer(Some(&json!(" 7 "))), Some(7));
        assert_eq!(lenient_integer(Some(&json!(5.6))), Some(6));
        assert_eq!(lenient_integer(Some(&json!("lots"))), None);
        assert_eq!(lenient_integer(Some(&json!(null))), None);
        assert_eq!(lenient_integer(None), None);
    }

    #[test]
    fn request_reads_camel_case_and_teacher_age_alias() {
        let request: GenerateDeckRequest = serde_json::from_value(json!({
            "topic": "Photosynthesis",
            "grade": "Grade 5",
            "slideCount": "4",
            "teacherAge": 28,
            "areaType": "rural",
            "language": "EN"
        }))
        .unwrap();
        let input = request.into_input();
        assert_eq!(input.topic.as_deref(), Some("Photosynthesis"));
        assert_eq!(input.slide_count, Some(4));
        assert_eq!(input.presenter_age, Some(28));
        assert_eq!(input.area_type.as_deref(), Some("rural"));
    }

    #[test]
    fn empty_body_is_all_defaults() {
        let input = serde_json::from_value::<GenerateDeckRequest>(json!({}))
            .unwrap()
            .into_input();
        assert!(input.topic.is_none());
        assert!(input.slide_count.is_none());
    }

    #[test]
    fn error_response_carries_code() {
        let error = LessonError::validation("topic", "Topic is required");
        let body = serde_json::to_value(ErrorResponse::from(&error)).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert!(body["message"].as_str().unwrap().contains("Topic is required"));
    }
}
