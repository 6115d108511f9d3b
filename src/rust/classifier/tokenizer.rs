use std::collections::HashMap;
use log::warn;

use super::error::ClassifierError;
use super::{OOV_ID, PAD_ID, SEQUENCE_LENGTH};

/// A fixed-length sequence of token ids produced by [`Vocabulary::tokenize`].
///
/// Every id is either [`PAD_ID`], [`OOV_ID`] or a valid index into the
/// vocabulary the sequence was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence([u32; SEQUENCE_LENGTH]);

impl TokenSequence {
    pub fn ids(&self) -> &[u32; SEQUENCE_LENGTH] {
        &self.0
    }

    /// Number of non-padding positions
    pub fn word_count(&self) -> usize {
        self.0.iter().filter(|&&id| id != PAD_ID).count()
    }
}

/// Ordered word list where the position of a word is its token id.
///
/// Ids 0 and 1 are reserved for padding and out-of-vocabulary words; whatever
/// strings occupy those slots in the vocabulary file are never matched.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, u32>,
}

impl Vocabulary {
    pub fn new(words: Vec<String>) -> Result<Self, ClassifierError> {
        if words.len() <= OOV_ID as usize {
            return Err(ClassifierError::MalformedModel(format!(
                "Vocabulary must contain the padding and OOV entries, found {} entries",
                words.len()
            )));
        }
        if u32::try_from(words.len()).is_err() {
            return Err(ClassifierError::MalformedModel("Vocabulary exceeds u32 id space".into()));
        }

        let mut index = HashMap::with_capacity(words.len());
        for (id, word) in words.iter().enumerate().skip(OOV_ID as usize + 1) {
            if index.contains_key(word) {
                warn!("Duplicate vocabulary entry '{}' at id {}, keeping first occurrence", word, id);
                continue;
            }
            index.insert(word.clone(), id as u32);
        }

        Ok(Self { words, index })
    }

    /// Parses a JSON array of strings
    pub fn from_json(bytes: &[u8]) -> Result<Self, ClassifierError> {
        let words: Vec<String> = serde_json::from_slice(bytes)?;
        Self::new(words)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn id_of(&self, word: &str) -> Option<u32> {
        self.index.get(word).copied()
    }

    /// Maps text to a fixed-length id sequence.
    ///
    /// Lower-cases the text, turns anything other than letters, digits,
    /// underscores and whitespace into a space, then looks up the first
    /// [`SEQUENCE_LENGTH`] words verbatim.
    pub fn tokenize(&self, text: &str) -> TokenSequence {
        let mut seq = [PAD_ID; SEQUENCE_LENGTH];
        for (slot, word) in seq.iter_mut().zip(normalize(text).split(' ').filter(|w| !w.is_empty())) {
            *slot = self.id_of(word).unwrap_or(OOV_ID);
        }
        TokenSequence(seq)
    }
}

fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
