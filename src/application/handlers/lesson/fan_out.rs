//! Fan-out of image requests for a lesson.

use futures::future::join_all;

use super::image_generator::ImageGenerator;

/// Images resolved for a deck, by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedImages {
    pub cover: Option<String>,
    /// One entry per lesson slide, in slide order.
    pub slides: Vec<Option<String>>,
}

impl ResolvedImages {
    /// Number of payloads received, cover included.
    pub fn received(&self) -> usize {
        usize::from(self.cover.is_some()) + self.slides.iter().filter(|s| s.is_some()).count()
    }
}

/// Requests the cover image and one image per slide concurrently.
///
/// All requests run to completion; one failing or slow request never cancels
/// the others. Results come back in input order. The warm-up probe runs on
/// its own task and is never awaited here.
pub async fn fan_out_images(
    generator: &ImageGenerator,
    cover_prompt: &str,
    slide_prompts: &[String],
) -> ResolvedImages {
    if !generator.is_configured() {
        return ResolvedImages {
            cover: None,
            slides: vec![None; slide_prompts.len()],
        };
    }

    let probe = generator.clone();
    tokio::spawn(async move { probe.warm_up().await });

    let requests = std::iter::once(cover_prompt)
        .chain(slide_prompts.iter().map(String::as_str))
        .enumerate()
        .map(|(position, prompt)| async move {
            let image = generator.generate(prompt).await;
            tracing::debug!(position, received = image.is_some(), "image request finished");
            image
        });

    let mut results = join_all(requests).await.into_iter();
    let cover = results.next().flatten();
    let slides: Vec<Option<String>> = results.collect();

    ResolvedImages { cover, slides }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::image::MockImageBackend;
    use crate::application::retry::RetryPolicy;
    use crate::config::ImageConfig;
    use crate::ports::ImageBackend;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn prompts(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("slide picture {}", i)).collect()
    }

    #[tokio::test]
    async fn unconfigured_generator_yields_all_none() {
        let images = fan_out_images(&ImageGenerator::disabled(), "cover", &prompts(4)).await;
        assert!(images.cover.is_none());
        assert_eq!(images.slides, vec![None; 4]);
        assert_eq!(images.received(), 0);
    }

    #[tokio::test]
    async fn results_keep_input_order() {
        let backend = Arc::new(
            MockImageBackend::new()
                .failing_on("picture 2")
                .failing_on("picture 5"),
        );
        let generator = ImageGenerator::new(
            Some(backend.clone() as Arc<dyn ImageBackend>),
            &ImageConfig::default(),
        )
        .with_policy(
            RetryPolicy::new(2, Duration::from_millis(200)).with_backoff(Duration::from_millis(1)),
        );

        let images = fan_out_images(&generator, "cover", &prompts(6)).await;

        assert!(images.cover.is_some());
        let present: Vec<bool> = images.slides.iter().map(Option::is_some).collect();
        assert_eq!(present, vec![true, false, true, true, false, true]);
        assert_eq!(images.received(), 5);
    }

    #[tokio::test]
    async fn unhealthy_service_does_not_delay_renders() {
        let backend = Arc::new(MockImageBackend::new().unhealthy());
        let generator = ImageGenerator::new(
            Some(backend.clone() as Arc<dyn ImageBackend>),
            &ImageConfig::default(),
        )
        .with_policy(RetryPolicy::new(1, Duration::from_millis(500)));

        let started = Instant::now();
        let images = fan_out_images(&generator, "cover", &prompts(1)).await;

        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(images.received(), 2);
    }

    #[tokio::test]
    async fn slow_images_are_fetched_concurrently() {
        let backend = Arc::new(
            MockImageBackend::new().with_delay_on("slide picture", Duration::from_millis(300)),
        );
        let generator = ImageGenerator::new(
            Some(backend.clone() as Arc<dyn ImageBackend>),
            &ImageConfig::default(),
        )
        .with_policy(RetryPolicy::new(1, Duration::from_secs(5)));

        let started = Instant::now();
        let images = fan_out_images(&generator, "cover", &prompts(6)).await;

        // Six sequential fetches would take 1.8s.
        assert!(started.elapsed() < Duration::from_millis(900));
        assert_eq!(images.received(), 7);
        assert_eq!(backend.render_calls(), 7);
    }
}
