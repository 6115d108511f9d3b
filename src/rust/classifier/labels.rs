use std::collections::HashMap;

use super::error::ClassifierError;
use super::NUM_LABELS;

/// Class names in class-index order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    pub fn new(labels: Vec<String>) -> Result<Self, ClassifierError> {
        if labels.len() != NUM_LABELS {
            return Err(ClassifierError::MalformedModel(format!(
                "Expected {} labels, found {}",
                NUM_LABELS,
                labels.len()
            )));
        }
        if let Some(pos) = labels.iter().position(|l| l.trim().is_empty()) {
            return Err(ClassifierError::MalformedModel(format!("Label {} is empty", pos)));
        }
        Ok(Self(labels))
    }

    /// Parses the `{"0": "name", ..., "15": "name"}` mapping of the labels file.
    /// Every index from 0 to 15 must be present and no other key is allowed.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ClassifierError> {
        let raw: HashMap<String, String> = serde_json::from_slice(bytes)?;
        let mut labels: Vec<Option<String>> = vec![None; NUM_LABELS];

        for (key, name) in raw {
            let index: usize = key
                .parse()
                .ok()
                .filter(|&i| i < NUM_LABELS)
                .ok_or_else(|| ClassifierError::MalformedModel(format!("Unexpected label key '{}'", key)))?;
            labels[index] = Some(name);
        }

        let labels = labels
            .into_iter()
            .enumerate()
            .map(|(i, l)| l.ok_or_else(|| ClassifierError::MalformedModel(format!("Missing label for index {}", i))))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(labels)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
