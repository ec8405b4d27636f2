use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use engine::{Pipeline, llm::Model, preferences::StoryPreferences};

#[derive(clap::Parser)]
struct Cli {
    api_key: String,
    model: Model,
    image: PathBuf,
    #[arg(default_value = "adventure")]
    genre: String,
    #[arg(default_value = "")]
    character: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;
    let args = Cli::parse();

    let pipeline = Pipeline::new(args.model.make(args.api_key));
    let mut prefs = StoryPreferences::new(args.genre, args.character);
    let result = pipeline.run(&args.image, &mut prefs).await?;

    println!("{}", result.story_text);
    println!(
        "Took {:.2?}, input tokens: {}, output tokens: {}",
        result.elapsed, result.input_tokens, result.output_tokens
    );
    Ok(())
}
