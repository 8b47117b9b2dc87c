//! Content normalizer - repairs generated lesson JSON into [`LessonContent`].
//!
//! Generated output is loosely shaped: bullets arrive as one long string,
//! as lists with blanks or non-strings, or not at all. Every slide leaves this
//! module with a title, one to five trimmed bullets, notes and an image prompt.
//!
//! Bullets longer than [`MAX_BULLET_CHARS`] are cut before their first `.`,
//! `:` or `;`. A long bullet without any separator is kept whole; it can
//! exceed the limit.
//!
//! Normalization is pure, deterministic and idempotent.

use serde_json::{Map, Value};

use super::content::{LessonContent, Slide};
use super::errors::LessonError;

pub const MAX_BULLETS: usize = 5;
pub const MAX_BULLET_CHARS: usize = 150;
pub const MISSING_CONTENT_BULLET: &str = "Content not generated";

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];
const CLAUSE_SEPARATORS: [char; 3] = ['.', ':', ';'];

/// Normalizes a parsed lesson object.
///
/// `topic` fills in a missing lesson title and image prompts; `max_slides`
/// drops any slides generated beyond the requested count.
///
/// # Errors
///
/// Returns `LessonError::Schema` if the value is not an object or `slides`
/// is absent or not an array.
pub fn normalize(
    value: &Value,
    topic: &str,
    max_slides: usize,
) -> Result<LessonContent, LessonError> {
    let Some(root) = value.as_object() else {
        return Err(LessonError::schema("expected a JSON object"));
    };
    let slides = match root.get("slides") {
        Some(Value::Array(slides)) => slides,
        Some(_) => return Err(LessonError::schema("'slides' must be an array")),
        None => return Err(LessonError::schema("missing 'slides' field")),
    };

    let title = text_field(root, &["title"]).unwrap_or_else(|| topic.trim().to_string());
    let subtitle = text_field(root, &["subtitle"]);

    let empty = Map::new();
    let slides = slides
        .iter()
        .take(max_slides)
        .enumerate()
        .map(|(index, raw)| {
            let object = raw.as_object().unwrap_or(&empty);
            normalize_slide(object, index + 1, topic)
        })
        .collect();

    Ok(LessonContent {
        title,
        subtitle,
        slides,
    })
}

fn normalize_slide(raw: &Map<String, Value>, position: usize, topic: &str) -> Slide {
    Slide {
        title: text_field(raw, &["title"]).unwrap_or_else(|| format!("Slide {}", position)),
        content: normalize_bullets(raw.get("content"), position),
        speaker_notes: text_field(raw, &["speaker_notes", "speakerNotes", "notes"])
            .unwrap_or_default(),
        image_prompt: text_field(raw, &["image_prompt", "imagePrompt"])
            .unwrap_or_else(|| format!("Educational illustration about {}", topic.trim())),
    }
}

/// Applies the bullet repair policy for the slide at 1-based `position`.
pub fn normalize_bullets(content: Option<&Value>, position: usize) -> Vec<String> {
    match content {
        Some(Value::String(text)) => {
            let bullets: Vec<String> = split_sentences(text)
                .into_iter()
                .map(shorten_bullet)
                .take(MAX_BULLETS)
                .collect();
            if bullets.is_empty() {
                vec![MISSING_CONTENT_BULLET.to_string()]
            } else {
                bullets
            }
        }
        Some(Value::Array(items)) => {
            let bullets: Vec<String> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(shorten_bullet)
                .take(MAX_BULLETS)
                .collect();
            if bullets.is_empty() {
                vec![format!("Key points for slide {}", position)]
            } else {
                bullets
            }
        }
        _ => vec![MISSING_CONTENT_BULLET.to_string()],
    }
}

/// Splits text on sentence terminators, trimming and dropping empties.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(SENTENCE_TERMINATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Cuts an over-length bullet before its first clause separator.
///
/// Bullets within the limit, and bullets with nothing before a separator or
/// no separator at all, are returned unchanged.
pub fn shorten_bullet(bullet: &str) -> String {
    let bullet = bullet.trim();
    if bullet.chars().count() <= MAX_BULLET_CHARS {
        return bullet.to_string();
    }
    match bullet.find(CLAUSE_SEPARATORS) {
        Some(index) => {
            let head = bullet[..index].trim();
            if head.is_empty() {
                bullet.to_string()
            } else {
                head.to_string()
            }
        }
        None => bullet.to_string(),
    }
}

/// First non-blank string among `keys`, trimmed.
fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const TOPIC: &str = "Photosynthesis";

    fn normalize_one(slide: Value) -> Slide {
        let lesson = normalize(&json!({ "slides": [slide] }), TOPIC, 16).unwrap();
        lesson.slides.into_iter().next().unwrap()
    }

    #[test]
    fn missing_slides_is_schema_error() {
        let err = normalize(&json!({ "title": "x" }), TOPIC, 5).unwrap_err();
        assert!(matches!(err, LessonError::Schema(_)));
    }

    #[test]
    fn top_level_array_is_schema_error() {
        let err = normalize(&json!([{ "title": "x" }]), TOPIC, 5).unwrap_err();
        assert!(matches!(err, LessonError::Schema(_)));
    }

    #[test]
    fn non_array_slides_is_schema_error() {
        let err = normalize(&json!({ "slides": "three slides" }), TOPIC, 5).unwrap_err();
        assert!(matches!(err, LessonError::Schema(_)));
    }

    #[test]
    fn missing_content_gets_placeholder() {
        let slide = normalize_one(json!({ "title": "Leaves" }));
        assert_eq!(slide.content, vec![MISSING_CONTENT_BULLET]);
    }

    #[test]
    fn non_text_content_gets_placeholder() {
        let slide = normalize_one(json!({ "title": "Leaves", "content": 42 }));
        assert_eq!(slide.content, vec![MISSING_CONTENT_BULLET]);
    }

    #[test]
    fn string_content_is_split_on_terminators() {
        let slide = normalize_one(json!({
            "content": "Plants make food. They need sunlight! Do they need water? Yes"
        }));
        assert_eq!(
            slide.content,
            vec![
                "Plants make food",
                "They need sunlight",
                "Do they need water",
                "Yes"
            ]
        );
    }

    #[test]
    fn string_content_keeps_at_most_five_fragments() {
        let slide = normalize_one(json!({ "content": "A. B. C. D. E. F. G." }));
        assert_eq!(slide.content, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn long_string_with_two_terminators_splits_exactly() {
        let first = "a".repeat(120);
        let second = "b".repeat(120);
        let third = "c".repeat(58);
        let text = format!("{}. {}! {}", first, second, third);
        assert_eq!(text.chars().count(), 302);

        let slide = normalize_one(json!({ "content": text }));
        assert_eq!(slide.content, vec![first, second, third]);
    }

    #[test]
    fn list_drops_blank_and_non_string_items() {
        let slide = normalize_one(json!({
            "content": ["  Chlorophyll is green  ", "", 7, null, "   ", "Roots absorb water"]
        }));
        assert_eq!(slide.content, vec!["Chlorophyll is green", "Roots absorb water"]);
    }

    #[test]
    fn empty_list_gets_positional_placeholder() {
        let lesson = normalize(
            &json!({ "slides": [{ "content": ["a"] }, { "content": ["", 3] }] }),
            TOPIC,
            16,
        )
        .unwrap();
        assert_eq!(lesson.slides[1].content, vec!["Key points for slide 2"]);
    }

    #[test]
    fn over_length_item_is_cut_at_first_separator() {
        let item = format!("Light energy becomes chemical energy: {}", "x".repeat(150));
        let slide = normalize_one(json!({ "content": [item] }));
        assert_eq!(slide.content, vec!["Light energy becomes chemical energy"]);
    }

    #[test]
    fn over_length_item_without_separator_is_kept_whole() {
        let item = "w".repeat(200);
        let slide = normalize_one(json!({ "content": [item.clone()] }));
        assert_eq!(slide.content, vec![item]);
    }

    #[test]
    fn over_length_item_starting_with_separator_is_kept_whole() {
        let item = format!(": {}", "w".repeat(200));
        assert_eq!(shorten_bullet(&item), item);
    }

    #[test]
    fn list_keeps_at_most_five_items() {
        let slide = normalize_one(json!({ "content": ["1", "2", "3", "4", "5", "6"] }));
        assert_eq!(slide.content.len(), MAX_BULLETS);
    }

    #[test]
    fn missing_fields_get_fallbacks() {
        let lesson = normalize(&json!({ "slides": [{}, {"title": "  "}] }), TOPIC, 16).unwrap();
        assert_eq!(lesson.title, TOPIC);
        assert!(lesson.subtitle.is_none());
        assert_eq!(lesson.slides[0].title, "Slide 1");
        assert_eq!(lesson.slides[1].title, "Slide 2");
        assert_eq!(lesson.slides[0].speaker_notes, "");
        assert_eq!(
            lesson.slides[0].image_prompt,
            "Educational illustration about Photosynthesis"
        );
    }

    #[test]
    fn non_object_slide_is_repaired() {
        let lesson = normalize(&json!({ "slides": ["just text"] }), TOPIC, 16).unwrap();
        assert_eq!(lesson.slides[0].title, "Slide 1");
        assert_eq!(lesson.slides[0].content, vec![MISSING_CONTENT_BULLET]);
    }

    #[test]
    fn camel_case_keys_are_accepted() {
        let slide = normalize_one(json!({
            "title": "Leaves",
            "content": ["Leaves are green"],
            "speakerNotes": "Show a leaf",
            "imagePrompt": "A green leaf in sunlight"
        }));
        assert_eq!(slide.speaker_notes, "Show a leaf");
        assert_eq!(slide.image_prompt, "A green leaf in sunlight");
    }

    #[test]
    fn extra_slides_are_dropped() {
        let lesson = normalize(
            &json!({ "slides": [{}, {}, {}, {}, {}] }),
            TOPIC,
            3,
        )
        .unwrap();
        assert_eq!(lesson.slide_count(), 3);
    }

    #[test]
    fn normalizing_normalized_content_is_identity() {
        let raw = json!({
            "title": " Photosynthesis ",
            "subtitle": "How plants eat",
            "slides": [
                { "title": "Intro", "content": "Plants make food. Sunlight helps!" },
                { "content": [format!("Long clause; {}", "z".repeat(160)), "Water"] },
                { "content": ["y".repeat(180)] },
                {}
            ]
        });
        let once = normalize(&raw, TOPIC, 16).unwrap();
        let twice = normalize(&serde_json::to_value(&once).unwrap(), TOPIC, 16).unwrap();
        assert_eq!(once, twice);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(
            text in "[a-zA-Z .!?:;]{0,400}",
            items in proptest::collection::vec("[a-z .:;]{0,200}", 0..8),
        ) {
            let raw = json!({
                "slides": [
                    { "content": text },
                    { "content": items },
                ]
            });
            let once = normalize(&raw, TOPIC, 16).unwrap();
            let twice = normalize(&serde_json::to_value(&once).unwrap(), TOPIC, 16).unwrap();
            prop_assert_eq!(&once, &twice);
            for slide in &once.slides {
                prop_assert!(!slide.content.is_empty());
                prop_assert!(slide.content.len() <= MAX_BULLETS);
                for bullet in &slide.content {
                    prop_assert_eq!(bullet.trim(), bullet.as_str());
                    prop_assert!(!bullet.is_empty());
                }
            }
        }
    }
}
