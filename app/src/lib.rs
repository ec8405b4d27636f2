use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::{
    Result,
    eyre::{WrapErr as _, eyre},
};
use engine::{ClassifiedError, GenerationResult, llm::Model};
use log::{debug, warn};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub mod cli;

pub const APP_NAME: &str = "Image to Story";
const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub model: Model,
}

impl Config {
    /// Values given on the command line or through the environment win over the file.
    pub fn resolve(file: Option<Config>, api_key: Option<String>, model: Option<Model>) -> Config {
        let file = file.unwrap_or_default();
        Config {
            api_key: api_key.unwrap_or(file.api_key),
            model: model.unwrap_or(file.model),
        }
    }
}

fn read_ron<T: DeserializeOwned>(config_file: &Path) -> Result<T> {
    let text = fs::read_to_string(config_file)?;
    Ok(ron::from_str(&text)?)
}

fn write_ron<T: Serialize>(config_file: &Path, value: &T) -> Result<()> {
    let pretty = ron::ser::PrettyConfig::default();
    Ok(fs::write(config_file, ron::ser::to_string_pretty(value, pretty)?)?)
}

/// `image_to_story.ron` in the platform's local config directory.
pub fn config_path() -> Result<PathBuf> {
    let dir = dirs::config_local_dir()
        .ok_or_else(|| eyre!("no local config directory on this platform, pass --config"))?;
    Ok(dir.join("image_to_story.ron"))
}

pub fn load_config(config_file: &Path) -> Result<Option<Config>> {
    if !config_file.exists() {
        debug!("no config at {}", config_file.display());
        return Ok(None);
    }
    read_ron(config_file)
        .map(Some)
        .wrap_err_with(|| format!("loading config {}", config_file.display()))
}

pub fn save_config(config_file: &Path, cfg: &Config) -> Result<()> {
    if let Some(dir) = config_file.parent() {
        fs::create_dir_all(dir)?;
    }
    write_ron(config_file, cfg)
}

/// Builds the run configuration. The file is only read for values the command line left
/// open, and a broken file is logged and skipped rather than aborting the run.
pub fn resolve_config(
    config_file: &Path,
    api_key: Option<String>,
    model: Option<Model>,
) -> Config {
    let file = if api_key.is_some() && model.is_some() {
        None
    } else {
        load_config(config_file).unwrap_or_else(|e| {
            warn!("ignoring config: {e:#}");
            None
        })
    };
    Config::resolve(file, api_key, model)
}

pub fn welcome_banner() -> String {
    let rule = "*".repeat(RULE_WIDTH);
    format!(
        "{rule}\n{}\n{rule}\n{}",
        center(&format!("Welcome to {APP_NAME}"), RULE_WIDTH),
        indoc::indoc! {"
            Give me a picture and I will write a story about it.
            Supported formats: JPEG, PNG and WEBP.
        "}
    )
}

pub fn render_story(result: &GenerationResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "\n{rule}\nGenerated Story:\n{rule}\n{}\n{rule}\nGenerated in {:.2?}\n",
        result.story_text.trim_end(),
        result.elapsed
    )
}

pub fn render_error(err: &ClassifiedError) -> String {
    format!("Error [{}]: {err}", err.kind())
}

pub fn farewell() -> String {
    format!("Thank you for using {APP_NAME}!")
}

fn center(text: &str, width: usize) -> String {
    format!("{text:^width$}").trim_end().to_string()
}
