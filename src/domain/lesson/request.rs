//! LessonRequest - Validated, immutable lesson parameters.
//!
//! Raw caller input arrives as [`LessonRequestInput`] with every field
//! optional. [`LessonRequest::from_input`] applies defaults, clamps numeric
//! ranges and rejects the only hard error: a missing or too-short topic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::LessonError;

pub const MIN_TOPIC_CHARS: usize = 3;
pub const MIN_SLIDES: u32 = 3;
pub const MAX_SLIDES: u32 = 16;
pub const DEFAULT_SLIDES: u32 = 6;
pub const MIN_PRESENTER_AGE: u32 = 20;
pub const MAX_PRESENTER_AGE: u32 = 70;
pub const DEFAULT_PRESENTER_AGE: u32 = 35;

const DEFAULT_GRADE: &str = "General audience";
const DEFAULT_TEACHING_METHOD: &str = "Interactive discussion";

/// Clamps a requested slide count into the supported range.
pub fn clamp_slide_count(requested: i64) -> u32 {
    requested.clamp(MIN_SLIDES as i64, MAX_SLIDES as i64) as u32
}

/// Clamps a presenter age into the supported range.
pub fn clamp_presenter_age(age: i64) -> u32 {
    age.clamp(MIN_PRESENTER_AGE as i64, MAX_PRESENTER_AGE as i64) as u32
}

/// Kind of place the students live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Urban,
    Rural,
    Mountain,
    Coastal,
    #[default]
    Other,
}

impl AreaType {
    /// Lenient parse; anything unrecognised is `Other`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for AreaType {
    type Err = LessonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "urban" | "city" => Ok(AreaType::Urban),
            "rural" | "village" => Ok(AreaType::Rural),
            "mountain" | "hilly" | "hill" => Ok(AreaType::Mountain),
            "coastal" | "coast" => Ok(AreaType::Coastal),
            "other" => Ok(AreaType::Other),
            other => Err(LessonError::validation(
                "areaType",
                format!("unknown area type '{}'", other),
            )),
        }
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AreaType::Urban => "urban",
            AreaType::Rural => "rural",
            AreaType::Mountain => "mountain",
            AreaType::Coastal => "coastal",
            AreaType::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// Language the slide text is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "EN")]
    English,
    #[serde(rename = "HI")]
    Hindi,
}

impl Language {
    /// Lenient parse; anything unrecognised is English.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// BCP-47 tag used for text runs in the deck.
    pub fn locale_tag(&self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Hindi => "hi-IN",
        }
    }
}

impl FromStr for Language {
    type Err = LessonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" | "en-us" | "en-in" => Ok(Language::English),
            "hi" | "hindi" | "hi-in" => Ok(Language::Hindi),
            other => Err(LessonError::validation(
                "language",
                format!("unsupported language '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "EN"),
            Language::Hindi => write!(f, "HI"),
        }
    }
}

/// Unvalidated lesson parameters as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct LessonRequestInput {
    pub topic: Option<String>,
    pub grade: Option<String>,
    pub slide_count: Option<i64>,
    pub presenter_age: Option<i64>,
    pub region: Option<String>,
    pub area_type: Option<String>,
    pub teaching_method: Option<String>,
    pub student_context: Option<String>,
    pub language: Option<String>,
}

/// Validated lesson parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRequest {
    topic: String,
    grade: String,
    slide_count: u32,
    presenter_age: u32,
    region: Option<String>,
    area_type: AreaType,
    teaching_method: String,
    student_context: Option<String>,
    language: Language,
}

impl LessonRequest {
    /// Builds a request from raw input.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::Validation` if the topic is missing or shorter
    /// than three characters after trimming.
    pub fn from_input(input: LessonRequestInput) -> Result<Self, LessonError> {
        let topic = input
            .topic
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if topic.is_empty() {
            return Err(LessonError::validation("topic", "topic is required"));
        }
        if topic.chars().count() < MIN_TOPIC_CHARS {
            return Err(LessonError::validation(
                "topic",
                format!("topic must be at least {} characters", MIN_TOPIC_CHARS),
            ));
        }

        Ok(Self {
            topic,
            grade: non_blank(input.grade).unwrap_or_else(|| DEFAULT_GRADE.to_string()),
            slide_count: clamp_slide_count(input.slide_count.unwrap_or(DEFAULT_SLIDES as i64)),
            presenter_age: clamp_presenter_age(
                input.presenter_age.unwrap_or(DEFAULT_PRESENTER_AGE as i64),
            ),
            region: non_blank(input.region),
            area_type: input
                .area_type
                .as_deref()
                .map(AreaType::parse_lenient)
                .unwrap_or_default(),
            teaching_method: non_blank(input.teaching_method)
                .unwrap_or_else(|| DEFAULT_TEACHING_METHOD.to_string()),
            student_context: non_blank(input.student_context),
            language: input
                .language
                .as_deref()
                .map(Language::parse_lenient)
                .unwrap_or_default(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn grade(&self) -> &str {
        &self.grade
    }

    pub fn slide_count(&self) -> u32 {
        self.slide_count
    }

    pub fn presenter_age(&self) -> u32 {
        self.presenter_age
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn area_type(&self) -> AreaType {
        self.area_type
    }

    pub fn teaching_method(&self) -> &str {
        &self.teaching_method
    }

    pub fn student_context(&self) -> Option<&str> {
        self.student_context.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
