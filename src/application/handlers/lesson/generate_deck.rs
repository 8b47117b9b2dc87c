//! GenerateDeckHandler - Command handler for turning a lesson request into a deck.
//!
//! Runs the pipeline in a straight line: validate, prompt, generate, parse,
//! normalize, fetch images, lay out, serialize. Only the text generation,
//! parsing and serialization steps can fail; images are best-effort.

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use super::fan_out::fan_out_images;
use super::image_generator::ImageGenerator;
use super::packager::{package, DeckPackage};
use crate::domain::deck::DeckAssembler;
use crate::domain::lesson::{
    normalize, parse_generated_json, LessonError, LessonPrompt, LessonRequest,
    LessonRequestInput,
};
use crate::ports::{DeckSerializer, GenerationError, TextGenerator};

/// Command to generate a lesson deck.
#[derive(Debug, Clone, Default)]
pub struct GenerateDeckCommand {
    pub input: LessonRequestInput,
}

/// Handler for deck generation.
pub struct GenerateDeckHandler {
    text_generator: Option<Arc<dyn TextGenerator>>,
    images: ImageGenerator,
    assembler: DeckAssembler,
    serializer: Arc<dyn DeckSerializer>,
}

impl GenerateDeckHandler {
    pub fn new(
        text_generator: Option<Arc<dyn TextGenerator>>,
        images: ImageGenerator,
        assembler: DeckAssembler,
        serializer: Arc<dyn DeckSerializer>,
    ) -> Self {
        Self {
            text_generator,
            images,
            assembler,
            serializer,
        }
    }

    pub fn text_generation_configured(&self) -> bool {
        self.text_generator.is_some()
    }

    pub fn image_service_configured(&self) -> bool {
        self.images.is_configured()
    }

    pub async fn handle(&self, cmd: GenerateDeckCommand) -> Result<DeckPackage, LessonError> {
        let started = Instant::now();
        let deck_id = Uuid::new_v4();

        // 1. Validate input
        let request = LessonRequest::from_input(cmd.input)?;
        tracing::info!(
            %deck_id,
            topic = %request.topic(),
            slide_count = request.slide_count(),
            language = %request.language(),
            area_type = %request.area_type(),
            "generating lesson deck"
        );

        // 2. Generate lesson content
        let generator = self
            .text_generator
            .as_ref()
            .ok_or_else(|| {
                GenerationError::NotConfigured("text generation API key is not set".to_string())
            })?;
        let provider = generator.provider_info();
        tracing::debug!(provider = %provider.name, model = %provider.model, "requesting lesson content");
        let prompt = LessonPrompt::build(&request);
        let raw = generator.generate(prompt.text()).await.map_err(|e| {
            tracing::error!(error = %e, "text generation failed");
            LessonError::from(e)
        })?;

        // 3. Parse and repair
        let value = parse_generated_json(&raw).map_err(|e| {
            tracing::warn!(error = %e, raw_len = raw.len(), "generated text is not valid JSON");
            e
        })?;
        let content = normalize(&value, request.topic(), request.slide_count() as usize)?;
        tracing::debug!(slides = content.slide_count(), "lesson content normalized");

        // 4. Resolve images concurrently
        let cover_prompt = LessonPrompt::cover_image_prompt(&request);
        let images = fan_out_images(&self.images, &cover_prompt, &content.image_prompts()).await;

        // 5. Lay out and serialize
        let deck = self
            .assembler
            .clone()
            .with_locale(request.language().locale_tag())
            .build(&content, images.cover.as_deref(), &images.slides);
        let package = package(self.serializer.as_ref(), &deck, request.topic())?;

        tracing::info!(
            %deck_id,
            topic = %request.topic(),
            slides = deck.slide_count(),
            images_received = images.received(),
            images_placed = package.preview.images_generated,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "lesson deck generated"
        );

        Ok(package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockTextGenerator;
    use crate::adapters::deck::PptxSerializer;

    const LESSON_JSON: &str = r#"{
        "title": "Photosynthesis",
        "subtitle": "How plants make food",
        "slides": [
            {"title": "What is it?", "content": ["Plants make food", "They use light"], "speaker_notes": "Ask students", "image_prompt": "A leaf"},
            {"title": "Ingredients", "content": "Water. Carbon dioxide. Sunlight.", "image_prompt": "Sun and water"}
        ]
    }"#;

    fn handler(generator: Option<MockTextGenerator>) -> GenerateDeckHandler {
        GenerateDeckHandler::new(
            generator.map(|g| Arc::new(g) as Arc<dyn TextGenerator>),
            ImageGenerator::disabled(),
            DeckAssembler::default(),
            Arc::new(PptxSerializer::new()),
        )
    }

    fn command(topic: &str) -> GenerateDeckCommand {
        GenerateDeckCommand {
            input: LessonRequestInput {
                topic: Some(topic.to_string()),
                slide_count: Some(3),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn invalid_topic_fails_before_generation() {
        let generator = MockTextGenerator::new().with_response(LESSON_JSON);
        let err = handler(Some(generator.clone()))
            .handle(command("ab"))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_generator_is_configuration_error() {
        let err = handler(None).handle(command("Photosynthesis")).await.unwrap_err();
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
        assert_eq!(err, LessonError::configuration("text generation API key is not set"));
    }

    #[tokio::test]
    async fn upstream_error_is_generation_error() {
        let generator = MockTextGenerator::new().with_error(GenerationError::status(500, "boom"));
        let err = handler(Some(generator))
            .handle(command("Photosynthesis"))
            .await
            .unwrap_err();
        assert!(matches!(err, LessonError::Generation(_)));
    }

    #[tokio::test]
    async fn prose_output_is_parse_error() {
        let generator = MockTextGenerator::new().with_response("Sure! Here is a lesson about plants.");
        let err = handler(Some(generator))
            .handle(command("Photosynthesis"))
            .await
            .unwrap_err();
        assert!(matches!(err, LessonError::Parse(_)));
    }

    #[tokio::test]
    async fn missing_slides_is_schema_error() {
        let generator = MockTextGenerator::new().with_response(r#"{"title": "Plants"}"#);
        let err = handler(Some(generator))
            .handle(command("Photosynthesis"))
            .await
            .unwrap_err();
        assert!(matches!(err, LessonError::Schema(_)));
    }

    #[tokio::test]
    async fn fenced_output_produces_a_deck() {
        let generator =
            MockTextGenerator::new().with_response(format!("```json\n{}\n```", LESSON_JSON));
        let package = handler(Some(generator))
            .handle(command("Photosynthesis"))
            .await
            .unwrap();
        assert_eq!(package.file_name, "Photosynthesis.pptx");
        assert_eq!(package.preview.title, "Photosynthesis");
        assert_eq!(package.preview.slide_count, 2);
        assert_eq!(package.preview.images_generated, 0);
        assert!(!package.file_data.is_empty());
    }

    #[tokio::test]
    async fn prompt_reaches_generator() {
        let generator = MockTextGenerator::new().with_response(LESSON_JSON);
        handler(Some(generator.clone()))
            .handle(command("Photosynthesis"))
            .await
            .unwrap();
        let prompts = generator.get_calls();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Topic: Photosynthesis"));
        assert!(prompts[0].contains("exactly 3 slides"));
    }

    #[test]
    fn reports_configuration() {
        let handler = handler(None);
        assert!(!handler.text_generation_configured());
        assert!(!handler.image_service_configured());
    }
}
