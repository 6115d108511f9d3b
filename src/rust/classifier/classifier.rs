use log::debug;
use serde::Serialize;

use super::error::ClassifierError;
use super::labels::LabelSet;
use super::model::{forward, Scores};
use super::tokenizer::{TokenSequence, Vocabulary};
use super::weights::WeightTensors;
use crate::rules::{
    extract_retry_timing, get_action, get_code_based_fallback, identify_blocklist, Action,
    BlocklistMatch,
};

/// Model confidence below which the rule cascade may override the label
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Messages are cut to this many characters before any processing
pub const MAX_INPUT_CHARS: usize = 5_000;

/// How the final label was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Decision {
    /// The network's top label was used as is
    Scored,
    /// The network was unsure and a rule supplied the label
    FallbackOverridden {
        #[serde(rename = "modelLabel")]
        model_label: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub label: String,
    /// Highest model probability, even when a rule overrode the label
    pub confidence: f32,
    pub action: Action,
    pub scores: Scores,
    pub decision: Decision,
    /// True when a rule overrode the model's label
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocklist: Option<BlocklistMatch>,
}

/// A loaded bounce classifier: vocabulary, labels and network weights.
///
/// Immutable once built, so it is `Send + Sync` and can be shared through an `Arc`.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use bounce_classifier::{Classifier, KNOWN_LABELS};
///
/// let vocab = r#"["", "[UNK]", "mailbox", "full"]"#;
/// let labels = serde_json::to_string(
///     &KNOWN_LABELS.iter().enumerate().map(|(i, l)| (i.to_string(), *l)).collect::<std::collections::HashMap<_, _>>(),
/// )?;
/// let weights = vec![0.0f32; bounce_classifier::expected_weight_count(4)];
///
/// let classifier = Classifier::builder()
///     .with_vocabulary_json(vocab.as_bytes())?
///     .with_labels_json(labels.as_bytes())?
///     .with_weights(weights)
///     .build()?;
///
/// let result = classifier.classify("552 5.2.2 Mailbox full")?;
/// assert_eq!(result.label, "mailbox_full");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Classifier {
    pub(crate) source: String,
    pub(crate) vocabulary: Vocabulary,
    pub(crate) labels: LabelSet,
    pub(crate) weights: WeightTensors,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the loaded model
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            source: self.source.clone(),
            vocab_size: self.vocabulary.len(),
            labels: self.labels.as_slice().to_vec(),
        }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn tokenize(&self, text: &str) -> TokenSequence {
        self.vocabulary.tokenize(text)
    }

    /// Raw model probabilities for a text, no rules applied
    pub fn scores(&self, text: &str) -> Scores {
        forward(&self.vocabulary.tokenize(text), &self.weights)
    }

    /// Classifies a bounce message.
    ///
    /// # Errors
    /// `InvalidInput` when the message is empty or only whitespace.
    pub fn classify(&self, message: &str) -> Result<ClassificationResult, ClassifierError> {
        if message.trim().is_empty() {
            return Err(ClassifierError::InvalidInput("Message cannot be empty".into()));
        }
        let message = truncate(message);

        let scores = self.scores(message);
        let (best, confidence) = scores.best();
        let model_label = self.labels.get(best).unwrap_or_default().to_string();

        let fallback = if confidence < CONFIDENCE_THRESHOLD {
            get_code_based_fallback(message)
        } else {
            None
        };

        let (label, decision) = match fallback {
            Some(rule_label) => {
                debug!(
                    "Confidence {:.3} below threshold, '{}' overridden by rule label '{}'",
                    confidence, model_label, rule_label
                );
                (rule_label.to_string(), Decision::FallbackOverridden { model_label })
            }
            None => {
                debug!("Model label '{}' with confidence {:.3}", model_label, confidence);
                (model_label, Decision::Scored)
            }
        };

        Ok(ClassificationResult {
            action: get_action(&label),
            used_fallback: matches!(decision, Decision::FallbackOverridden { .. }),
            label,
            confidence,
            scores,
            decision,
            retry_after_seconds: extract_retry_timing(message),
            blocklist: identify_blocklist(message),
        })
    }

    /// Classifies a JSON value, rejecting anything that is not a string
    pub fn classify_value(&self, value: &serde_json::Value) -> Result<ClassificationResult, ClassifierError> {
        match value {
            serde_json::Value::String(message) => self.classify(message),
            serde_json::Value::Null => Err(ClassifierError::InvalidInput("Message cannot be null".into())),
            other => Err(ClassifierError::InvalidInput(format!(
                "Message must be a string, got {}",
                json_type_name(other)
            ))),
        }
    }

    /// Classifies each message independently
    pub fn classify_batch<S: AsRef<str>>(&self, messages: &[S]) -> Vec<Result<ClassificationResult, ClassifierError>> {
        messages.iter().map(|m| self.classify(m.as_ref())).collect()
    }
}

fn truncate(message: &str) -> &str {
    match message.char_indices().nth(MAX_INPUT_CHARS) {
        Some((end, _)) => &message[..end],
        None => message,
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::weights::{expected_weight_count, FIXED_WEIGHT_COUNT};
    use crate::classifier::{EMBEDDING_DIM, HIDDEN_UNITS, NUM_LABELS};
    use crate::rules::KNOWN_LABELS;

    const VOCAB: [&str; 5] = ["", "[UNK]", "quota", "relay", "denied"];
    const DENSE2_BIAS_OFFSET: usize = FIXED_WEIGHT_COUNT - NUM_LABELS;

    fn classifier_with(buffer: Vec<f32>) -> Classifier {
        Classifier::builder()
            .with_vocabulary(Vocabulary::new(VOCAB.iter().map(|s| s.to_string()).collect()).unwrap())
            .with_labels(LabelSet::new(KNOWN_LABELS.iter().map(|s| s.to_string()).collect()).unwrap())
            .with_weights(buffer)
            .build()
            .expect("Failed to create classifier")
    }

    /// Confident network: label 12 (relay_denied) via its output bias
    fn confident_classifier() -> Classifier {
        let mut buffer = vec![0.0; expected_weight_count(VOCAB.len())];
        buffer[DENSE2_BIAS_OFFSET + 12] = 10.0;
        classifier_with(buffer)
    }

    fn uniform_classifier() -> Classifier {
        classifier_with(vec![0.0; expected_weight_count(VOCAB.len())])
    }

    #[test]
    fn test_confident_model_is_not_overridden() {
        let result = confident_classifier().classify("550 5.1.1 user unknown").unwrap();
        assert_eq!(result.label, "relay_denied");
        assert_eq!(result.decision, Decision::Scored);
        assert!(!result.used_fallback);
        assert!(result.confidence > 0.99);
        assert_eq!(result.action, Action::FixConfig);
    }

    #[test]
    fn test_low_confidence_uses_rules() {
        let result = uniform_classifier().classify("552 5.2.2 Mailbox quota exceeded").unwrap();
        assert_eq!(result.label, "mailbox_full");
        assert!(result.used_fallback);
        assert_eq!(
            result.decision,
            Decision::FallbackOverridden { model_label: "auth_failure".into() }
        );
        // reported confidence stays the model's
        assert!((result.confidence - 1.0 / 16.0).abs() < 1e-6);
        assert_eq!(result.action, Action::Retry);
    }

    #[test]
    fn test_low_confidence_without_rule_keeps_model_label() {
        let result = uniform_classifier().classify("something odd happened").unwrap();
        assert_eq!(result.label, "auth_failure");
        assert_eq!(result.decision, Decision::Scored);
    }

    #[test]
    fn test_pooling_uses_sequence_length() {
        let mut buffer = vec![0.0; expected_weight_count(VOCAB.len())];
        buffer[FIXED_WEIGHT_COUNT + 2 * EMBEDDING_DIM] = 100.0;
        buffer[0] = 1.0;
        buffer[EMBEDDING_DIM * HIDDEN_UNITS + HIDDEN_UNITS + 8] = 5.0;
        let classifier = classifier_with(buffer);

        let one = classifier.scores("quota");
        let two = classifier.scores("quota quota");
        assert_eq!(one.best().0, 8);
        assert!(two.as_slice()[8] > one.as_slice()[8]);
    }

    #[test]
    fn test_auxiliary_fields() {
        let result = uniform_classifier()
            .classify("421 4.7.0 Listed by spamhaus, try again in 10 minutes")
            .unwrap();
        assert_eq!(result.retry_after_seconds, Some(600));
        assert_eq!(result.blocklist.unwrap().names(), vec!["Spamhaus"]);
    }

    #[test]
    fn test_invalid_input() {
        let classifier = uniform_classifier();
        assert!(matches!(classifier.classify(""), Err(ClassifierError::InvalidInput(_))));
        assert!(matches!(classifier.classify(" \n\t "), Err(ClassifierError::InvalidInput(_))));
        assert!(matches!(
            classifier.classify_value(&serde_json::Value::Null),
            Err(ClassifierError::InvalidInput(_))
        ));
        assert!(matches!(
            classifier.classify_value(&serde_json::json!(42)),
            Err(ClassifierError::InvalidInput(_))
        ));
        assert!(classifier.classify_value(&serde_json::json!("mailbox full")).is_ok());
    }

    #[test]
    fn test_truncation_hides_late_matches() {
        let message = format!("{}relay access denied", "x ".repeat(MAX_INPUT_CHARS));
        let result = uniform_classifier().classify(&message).unwrap();
        assert_eq!(result.decision, Decision::Scored);
        assert_eq!(truncate(&message).chars().count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let message = "é".repeat(MAX_INPUT_CHARS + 3);
        assert_eq!(truncate(&message).chars().count(), MAX_INPUT_CHARS);
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_batch() {
        let results = uniform_classifier().classify_batch(&["quota exceeded", "", "relay denied"]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().label, "mailbox_full");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().label, "relay_denied");
    }

    #[test]
    fn test_json_shape() {
        let result = uniform_classifier().classify("Mailbox full, retry in 1 hour").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["label"], "mailbox_full");
        assert_eq!(json["action"], "retry");
        assert_eq!(json["retryAfterSeconds"], 3600);
        assert_eq!(json["decision"]["source"], "fallback_overridden");
        assert_eq!(json["usedFallback"], true);
        assert_eq!(json["scores"].as_array().unwrap().len(), 16);
        assert!(json.get("blocklist").is_none());
    }
}
