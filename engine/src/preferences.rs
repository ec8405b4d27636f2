use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use color_eyre::{
    Result,
    eyre::{WrapErr as _, bail},
};
use log::debug;

pub const SUGGESTED_GENRES: [&str; 3] = ["adventure", "mystery", "fairy tale"];

/// How the operator wants the story told. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPreferences {
    genre: String,
    character_name: Option<String>,
}

impl StoryPreferences {
    /// Lower-cases the genre. An empty character name means "let the model invent one".
    pub fn new(genre: impl AsRef<str>, character_name: impl Into<String>) -> Self {
        let character_name = character_name.into();
        Self {
            genre: genre.as_ref().to_lowercase(),
            character_name: (!character_name.is_empty()).then_some(character_name),
        }
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn character_name(&self) -> Option<&str> {
        self.character_name.as_deref()
    }
}

/// Anything that can hand the pipeline a set of preferences.
pub trait PreferenceSource {
    fn collect(&mut self) -> Result<StoryPreferences>;
}

impl PreferenceSource for StoryPreferences {
    fn collect(&mut self) -> Result<StoryPreferences> {
        Ok(self.clone())
    }
}

/// Line-based interactive prompts over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .wrap_err_with(|| format!("reading answer to {question:?}"))?;
        if n == 0 {
            bail!("input closed before answering {question:?}");
        }

        let answer = line.strip_suffix('\n').unwrap_or(&line);
        let answer = answer.strip_suffix('\r').unwrap_or(answer);
        debug!("{question:?} -> {answer:?}");
        Ok(answer.to_string())
    }

    pub fn image_path(&mut self) -> Result<PathBuf> {
        Ok(self.ask("Enter the path to your image file: ")?.into())
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}

impl<R: BufRead, W: Write> PreferenceSource for Console<R, W> {
    fn collect(&mut self) -> Result<StoryPreferences> {
        let genre = self.ask(&format!(
            "Enter a story genre (e.g. {}): ",
            SUGGESTED_GENRES.join(", ")
        ))?;
        let character =
            self.ask("Enter a name for the main character (leave empty to invent one): ")?;
        Ok(StoryPreferences::new(genre, character))
    }
}
