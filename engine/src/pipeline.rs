use std::{
    path::Path,
    time::{Duration, Instant},
};

use log::{info, warn};

use crate::{
    ClientBox,
    error::ClassifiedError,
    input_image,
    llm::GenerationClient,
    preferences::PreferenceSource,
    prompt::{self, GenerationRequest},
};

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub story_text: String,
    /// Time spent inside the service call only.
    pub elapsed: Duration,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

pub type Outcome = Result<GenerationResult, ClassifiedError>;

type FinishHook = Box<dyn Fn(&Outcome) + Send + Sync>;

/// Runs validate -> collect preferences -> build -> generate for one image.
pub struct Pipeline {
    client: ClientBox,
    on_finish: Option<FinishHook>,
}

impl Pipeline {
    pub fn new(client: ClientBox) -> Self {
        Self {
            client,
            on_finish: None,
        }
    }

    /// Registers an action that runs once after every run, whatever the outcome.
    pub fn on_finish(mut self, hook: impl Fn(&Outcome) + Send + Sync + 'static) -> Self {
        self.on_finish = Some(Box::new(hook));
        self
    }

    /// Preferences are only collected once the image has been validated.
    pub async fn run(&self, image_path: &Path, prefs: &mut impl PreferenceSource) -> Outcome {
        let outcome = self.run_stages(image_path, prefs).await;

        match &outcome {
            Ok(result) => info!(
                "story generated by {} in {:.2?}",
                self.client.model(),
                result.elapsed
            ),
            Err(e) => warn!("run failed with {}: {e}", e.kind()),
        }

        if let Some(hook) = &self.on_finish {
            hook(&outcome);
        }
        outcome
    }

    async fn run_stages(&self, image_path: &Path, prefs: &mut impl PreferenceSource) -> Outcome {
        let image = input_image::validate(image_path)?;
        let prefs = prefs.collect()?;
        let request = prompt::build(image, &prefs);
        generate(self.client.as_ref(), &request).await
    }
}

/// Calls the service once and rejects blank answers.
pub async fn generate(
    client: &(dyn GenerationClient + Send + Sync),
    request: &GenerationRequest,
) -> Outcome {
    let start = Instant::now();
    let output = client.generate(request).await?;
    let elapsed = start.elapsed();

    if output.text.trim().is_empty() {
        return Err(ClassifiedError::EmptyResponse {
            finish_reason: output.finish_reason,
        });
    }

    Ok(GenerationResult {
        story_text: output.text,
        elapsed,
        input_tokens: output.input_tokens,
        output_tokens: output.output_tokens,
    })
}
