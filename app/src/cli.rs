use std::path::PathBuf;

use engine::llm::Model;

/// Turn a picture into a story
#[derive(Debug, clap::Parser)]
pub struct Cli {
    /// Gemini API key, overrides the config file
    #[arg(short, long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide = true, hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(short, long)]
    pub model: Option<Model>,

    /// Use this config file instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Store the API key and model in the config file
    Configure(Configure),
    /// List the supported models
    Models,
}

#[derive(Debug, clap::Args)]
pub struct Configure {
    #[arg(long)]
    pub api_key: String,
    #[arg(long, default_value_t)]
    pub model: Model,
}

impl Cli {
    pub fn api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| self.gemini_api_key.clone())
    }
}
