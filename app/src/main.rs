use std::{io, process::ExitCode};

use clap::Parser;
use color_eyre::Result;
use engine::{ClassifiedError, Pipeline, llm::Model, preferences::Console};
use image_to_story::{
    Config,
    cli::{Cli, Command},
    config_path, farewell, render_error, render_story, resolve_config, save_config, welcome_banner,
};
use log::info;
use strum::IntoEnumIterator;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    pretty_env_logger::init();
    color_eyre::install()?;
    let cli = Cli::parse();
    let api_key = cli.api_key();
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => config_path()?,
    };

    match cli.command {
        Some(Command::Configure(args)) => {
            save_config(
                &path,
                &Config {
                    api_key: args.api_key,
                    model: args.model,
                },
            )?;
            println!("Saved config to {}", path.display());
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Models) => {
            for model in Model::iter() {
                let marker = if model == Model::default() { " (default)" } else { "" };
                println!("{model}{marker}");
            }
            return Ok(ExitCode::SUCCESS);
        }
        None => {}
    }

    let config = resolve_config(&path, api_key, cli.model);
    info!("using {}", config.model);

    let pipeline = Pipeline::new(config.model.make(config.api_key)).on_finish(|outcome| {
        match outcome {
            Ok(result) => println!("{}", render_story(result)),
            Err(e) => eprintln!("{}", render_error(e)),
        }
        println!("{}", farewell());
    });

    println!("{}", welcome_banner());
    let mut console = Console::new(io::stdin().lock(), io::stdout());
    let image_path = match console.image_path() {
        Ok(path) => path,
        Err(e) => {
            let err = ClassifiedError::from(e);
            eprintln!("{}", render_error(&err));
            println!("{}", farewell());
            return Ok(ExitCode::from(err.kind().exit_code()));
        }
    };

    let code = match pipeline.run(&image_path, &mut console).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(e.kind().exit_code()),
    };
    Ok(code)
}
