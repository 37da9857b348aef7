use include_dir::{include_dir, Dir};
use serde::Deserialize;

use crate::error::{Error, Result};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Name of the word list bundled with the binary.
pub const COMMON: &str = "common";

/// A non-empty static word list.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Dictionary {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Dictionary {
    /// Loads one of the word lists embedded under `src/lang`.
    pub fn load(name: &str) -> Result<Self> {
        let file = LANG_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| Error::UnknownDictionary(name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| Error::UnknownDictionary(name.to_string()))?;

        let dictionary: Dictionary = serde_json::from_str(contents)?;
        dictionary.validated()
    }

    pub fn common() -> Result<Self> {
        Self::load(COMMON)
    }

    pub fn from_words(name: &str, words: Vec<String>) -> Result<Self> {
        Self {
            name: name.to_string(),
            size: words.len() as u32,
            words,
        }
        .validated()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn validated(self) -> Result<Self> {
        if self.words.is_empty() {
            return Err(Error::EmptyDictionary(self.name));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_common_dictionary_loads() {
        let dict = Dictionary::common().unwrap();

        assert_eq!(dict.name, "common");
        assert_eq!(dict.size as usize, dict.len());
        assert_eq!(dict.len(), 160);
        assert!(dict.contains("the"));
        assert!(dict.contains("city"));
    }

    #[test]
    fn test_unknown_dictionary() {
        let result = Dictionary::load("klingon");
        assert_matches!(result, Err(Error::UnknownDictionary(name)) if name == "klingon");
    }

    #[test]
    fn test_empty_word_list_is_rejected() {
        let result = Dictionary::from_words("nothing", vec![]);
        assert_matches!(result, Err(Error::EmptyDictionary(_)));
    }

    #[test]
    fn test_dictionary_deserialization() {
        let json_data = r#"
        {
            "name": "test",
            "size": 3,
            "words": ["hello", "world", "test"]
        }
        "#;

        let dict: Dictionary = serde_json::from_str(json_data).unwrap();

        assert_eq!(dict.name, "test");
        assert_eq!(dict.size, 3);
        assert!(dict.contains("world"));
        assert!(!dict.contains("moon"));
    }
}
