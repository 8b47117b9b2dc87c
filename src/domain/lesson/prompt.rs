//! Prompt builder - turns lesson parameters into generation instructions.
//!
//! Pure and infallible: every input has already been defaulted or clamped by
//! [`LessonRequest`](super::LessonRequest).

use super::request::{AreaType, Language, LessonRequest};

/// Maximum characters per bullet requested from the model.
pub const PROMPT_BULLET_MAX_CHARS: usize = 100;

/// Presenter tone, chosen from the presenter's age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneBand {
    /// Presenter younger than 30.
    Energetic,
    /// Presenter aged 30 to 50.
    Balanced,
    /// Presenter older than 50.
    Seasoned,
}

impl ToneBand {
    pub fn for_age(age: u32) -> Self {
        match age {
            0..=29 => ToneBand::Energetic,
            30..=50 => ToneBand::Balanced,
            _ => ToneBand::Seasoned,
        }
    }

    pub fn directive(&self) -> &'static str {
        match self {
            ToneBand::Energetic => {
                "Use an energetic, friendly and relatable tone with contemporary examples \
                 and quick interactive moments."
            }
            ToneBand::Balanced => {
                "Use a clear, balanced and well-structured tone that mixes explanation \
                 with guided questions."
            }
            ToneBand::Seasoned => {
                "Use a calm, authoritative and story-driven tone that draws on experience \
                 and real-world wisdom."
            }
        }
    }
}

/// Local context phrase for the students' surroundings.
pub fn local_context(area: AreaType) -> &'static str {
    match area {
        AreaType::Urban => {
            "Students live in a city: use examples from markets, traffic, public \
             transport, apartments and city services."
        }
        AreaType::Rural => {
            "Students live in a village: use examples from farming, livestock, seasons, \
             local crafts and village life."
        }
        AreaType::Mountain => {
            "Students live in a mountain area: use examples from slopes, rivers, forests, \
             terrace farming and changing weather."
        }
        AreaType::Coastal => {
            "Students live near the coast: use examples from fishing, tides, boats, \
             beaches and monsoon weather."
        }
        AreaType::Other => {
            "Use everyday examples that students from any background can relate to."
        }
    }
}

/// Language directive for the generated text.
pub fn language_directive(language: Language) -> &'static str {
    match language {
        Language::English => "Write every title, bullet and speaker note in simple English.",
        Language::Hindi => {
            "Write every title, bullet and speaker note in simple Hindi using Devanagari \
             script. Keep every image_prompt in English."
        }
    }
}

/// JSON shape the model must answer with.
pub const OUTPUT_SCHEMA: &str = r#"{
  "title": "Lesson title",
  "subtitle": "One-line subtitle",
  "slides": [
    {
      "title": "Slide title",
      "content": ["Short bullet", "Short bullet", "Short bullet"],
      "speaker_notes": "What the teacher says while presenting this slide",
      "image_prompt": "English description of a single educational illustration"
    }
  ]
}"#;

/// A fully built generation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonPrompt {
    pub instruction: String,
    pub language_directive: &'static str,
    pub tone_directive: &'static str,
    pub local_context: &'static str,
}

impl LessonPrompt {
    /// Builds the prompt for a request.
    pub fn build(request: &LessonRequest) -> Self {
        let language = language_directive(request.language());
        let tone = ToneBand::for_age(request.presenter_age()).directive();
        let context = local_context(request.area_type());

        let mut text = String::with_capacity(2048);
        text.push_str("You are an expert teacher designing a slide presentation for a lesson.\n\n");
        text.push_str(&format!("Topic: {}\n", request.topic()));
        text.push_str(&format!("Audience: {}\n", request.grade()));
        text.push_str(&format!("Teaching method: {}\n", request.teaching_method()));
        if let Some(region) = request.region() {
            text.push_str(&format!("Region: {}\n", region));
        }
        text.push_str(&format!("Area type: {}\n", request.area_type()));
        if let Some(students) = request.student_context() {
            text.push_str(&format!("About the students: {}\n", students));
        }
        text.push('\n');
        text.push_str(&format!("Language: {}\n", language));
        text.push_str(&format!("Tone: {}\n", tone));
        text.push_str(&format!("Local context: {}\n\n", context));
        text.push_str("Requirements:\n");
        text.push_str(&format!(
            "- Create exactly {} slides that follow the teaching method.\n",
            request.slide_count()
        ));
        text.push_str(&format!(
            "- Each slide has 3 to 5 bullets of at most {} characters each.\n",
            PROMPT_BULLET_MAX_CHARS
        ));
        text.push_str("- Speaker notes explain how to teach the slide in 2 to 4 sentences.\n");
        text.push_str(
            "- image_prompt describes one photorealistic illustration in English, without any text in the image.\n\n",
        );
        text.push_str(
            "Respond with JSON only, no markdown and no commentary, matching exactly this shape:\n",
        );
        text.push_str(OUTPUT_SCHEMA);

        Self {
            instruction: text,
            language_directive: language,
            tone_directive: tone,
            local_context: context,
        }
    }

    /// The complete text sent to the generation service.
    pub fn text(&self) -> &str {
        &self.instruction
    }

    /// English prompt for the title-slide image.
    pub fn cover_image_prompt(request: &LessonRequest) -> String {
        format!(
            "A welcoming classroom-style cover illustration representing {} for {} students",
            request.topic(),
            request.grade()
        )
    }
}
