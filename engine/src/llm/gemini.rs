use std::pin::Pin;

use log::info;

use crate::{
    llm::{GenerationClient, Model, OutputMessage, ServiceError},
    prompt::GenerationRequest,
};

mod gemini_api;

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    model: Model,
    client: reqwest::Client,
}

impl Gemini {
    pub fn new(api_key: String, model: Model) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

impl GenerationClient for Gemini {
    fn generate<'a>(
        &'a self,
        req: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<OutputMessage, ServiceError>> + Send + 'a>> {
        Box::pin(async move {
            let gemini_req = gemini_api::Request {
                api_key: &self.api_key,
                model: self.model,
                body: gemini_api::RequestBody::from_parts(&req.parts()),
            };

            let output = gemini_api::send_request(gemini_req, &self.client)
                .await?
                .into_output();
            info!(
                "{} answered: input tokens: {}, output tokens: {}",
                self.model, output.input_tokens, output.output_tokens
            );
            Ok(output)
        })
    }

    fn model(&self) -> Model {
        self.model
    }
}
