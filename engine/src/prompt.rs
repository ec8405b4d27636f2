use indoc::formatdoc;

use crate::{input_image::ImageReference, preferences::StoryPreferences};

pub const INVENT_CHARACTER_DIRECTIVE: &str =
    "Invent an original character who fits the scene in the image.";

/// One ordered piece of a multi-part request.
#[derive(Debug, Clone)]
pub enum Part<'a> {
    Text(&'a str),
    Image(&'a ImageReference),
}

#[derive(Debug)]
pub struct GenerationRequest {
    pub instruction_text: String,
    pub image: ImageReference,
}

impl GenerationRequest {
    /// The payload in the order the service receives it: instructions first, then the image.
    pub fn parts(&self) -> [Part<'_>; 2] {
        [Part::Text(&self.instruction_text), Part::Image(&self.image)]
    }
}

pub fn build(image: ImageReference, prefs: &StoryPreferences) -> GenerationRequest {
    GenerationRequest {
        instruction_text: instruction_text(prefs),
        image,
    }
}

fn instruction_text(prefs: &StoryPreferences) -> String {
    let character = match prefs.character_name() {
        Some(name) => format!("The main character is {name}."),
        None => INVENT_CHARACTER_DIRECTIVE.to_string(),
    };

    formatdoc! {"
        Create a creative {genre} story based on this image.
        Genre: {genre}
        {character}

        Guidelines:
        - Describe the scene in the image vividly and weave its details into the narrative.
        - Include dialogue between the characters.
        - Add at least one surprising plot twist.
        - Keep the tone playful, feel free to use a few emoji.
        - The story must be suitable for all ages.
        ",
        genre = prefs.genre(),
    }
}

#[cfg(test)]
mod test {
    use expect_test::expect;
    use tempfile::TempDir;

    use crate::input_image::{self, test::write_png};

    use super::*;

    fn sample_image() -> (TempDir, ImageReference) {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "cat.png");
        let image = input_image::validate(path).unwrap();
        (dir, image)
    }

    #[test]
    fn invents_character_when_name_is_empty() {
        let (_dir, image) = sample_image();
        let req = build(image, &StoryPreferences::new("Mystery", ""));

        expect![[r#"
            Create a creative mystery story based on this image.
            Genre: mystery
            Invent an original character who fits the scene in the image.

            Guidelines:
            - Describe the scene in the image vividly and weave its details into the narrative.
            - Include dialogue between the characters.
            - Add at least one surprising plot twist.
            - Keep the tone playful, feel free to use a few emoji.
            - The story must be suitable for all ages.
        "#]]
        .assert_eq(&req.instruction_text);
    }

    #[test]
    fn uses_given_character_name() {
        let (_dir, image) = sample_image();
        let req = build(image, &StoryPreferences::new("adventure", "Captain Whiskers"));
        assert!(req.instruction_text.contains("Captain Whiskers"));
        assert!(!req.instruction_text.contains(INVENT_CHARACTER_DIRECTIVE));
        assert!(req.instruction_text.contains("adventure"));
    }

    #[test]
    fn building_is_pure() {
        let (_dir, image) = sample_image();
        let prefs = StoryPreferences::new("fairy tale", "Mia");
        let a = build(image.clone(), &prefs);
        let b = build(image, &prefs);
        assert_eq!(a.instruction_text, b.instruction_text);
    }

    #[test]
    fn parts_are_text_then_image() {
        let (_dir, image) = sample_image();
        let req = build(image, &StoryPreferences::new("mystery", ""));
        let [first, second] = req.parts();
        assert!(matches!(first, Part::Text(t) if t == req.instruction_text));
        assert!(matches!(second, Part::Image(img) if img.path.ends_with("cat.png")));
    }
}
