use crate::llm::GenerationClient;

pub mod error;
pub mod input_image;
pub mod llm;
pub mod pipeline;
pub mod preferences;
pub mod prompt;

pub use error::{ClassifiedError, ErrorKind};
pub use pipeline::{GenerationResult, Outcome, Pipeline};

pub type ClientBox = Box<dyn GenerationClient + Send + Sync>;
