//! Illustration generation with bounded retries.

use crate::model::{GenerateRequest, GenerativeModel};
use deckgen_core::{Attempt, RasterImage, RetryPolicy, Subtopic, Topic};

/// Prompt asking for a text-free illustration of `subtopic`.
pub fn image_prompt(subtopic: &Subtopic, topic: &Topic) -> String {
    format!(
        "Create a hyper-realistic and intricately detailed 3D rendered image that artistically \
         represents the concept of '{subtopic}' within the context of '{topic}'. The image should \
         depict a dynamic scene filled with realistic elements, natural lighting, and rich textures \
         that emphasize the emotional and practical significance of '{subtopic}'\u{2014}using symbolic \
         visual cues rather than any text or labels.",
        subtopic = subtopic,
        topic = topic
    )
}

/// Fetches one illustration per subtopic, retrying under the policy.
///
/// Giving up is not an error: [`ImageFetcher::image`] then returns `None`
/// and the slide is built without a picture.
pub struct ImageFetcher<'a, M: GenerativeModel + ?Sized> {
    model: &'a M,
    model_name: String,
    policy: RetryPolicy,
}

impl<'a, M: GenerativeModel + ?Sized> ImageFetcher<'a, M> {
    /// Create a fetcher using the default policy (5 attempts, 5 s apart).
    pub fn new(model: &'a M, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            policy: RetryPolicy::new(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generate an illustration, or `None` once every attempt has failed.
    ///
    /// A response without an image part, or with a payload that does not
    /// decode, uses up the attempt like a service error does.
    pub fn image(&self, subtopic: &Subtopic, topic: &Topic) -> Option<RasterImage> {
        let request = GenerateRequest::text_and_image(
            self.model_name.as_str(),
            image_prompt(subtopic, topic),
        );

        let image = self.policy.run(|attempt| {
            log::debug!("Image attempt {} for '{}'", attempt, subtopic);
            match self.model.generate(&request) {
                Ok(response) => match response.first_inline_data() {
                    Some(data) => Attempt::from(RasterImage::decode(data).map(Some)),
                    None => Attempt::Empty,
                },
                Err(e) => Attempt::Failed(e),
            }
        });

        if image.is_none() {
            log::warn!(
                "No image for '{}' after {} attempts; continuing without one",
                subtopic,
                self.policy.max_attempts()
            );
        }
        image
    }
}
