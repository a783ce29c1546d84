//! Classifier artifact: tf-idf vocabulary + linear model + label table.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::error::ClassifierError;

/// Word tokens of at least two characters, the vectorizer's token pattern.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Serialized classification pipeline: vectorize -> classify -> decode.
///
/// One JSON document holding the tf-idf vocabulary and idf weights, a linear
/// classifier (one coefficient row and intercept per label), and the label
/// table used to decode the argmax index.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierArtifact {
    /// Token -> feature index.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index.
    pub idf: Vec<f32>,
    /// Category labels, indexed by class.
    pub labels: Vec<String>,
    /// Linear coefficients, one row per label.
    pub coefficients: Vec<Vec<f32>>,
    /// Intercept per label.
    pub intercepts: Vec<f32>,
}

impl ClassifierArtifact {
    /// Reads and validates an artifact from `path`.
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let artifact: Self = serde_json::from_str(&content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Checks internal consistency of the artifact tables.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let dim = self.idf.len();

        if self.labels.is_empty() {
            return Err(ClassifierError::InvalidArtifact {
                reason: "label table is empty".to_string(),
            });
        }

        if let Some(&index) = self.vocabulary.values().find(|&&index| index >= dim) {
            return Err(ClassifierError::InvalidArtifact {
                reason: format!("vocabulary index {index} exceeds idf dimension {dim}"),
            });
        }

        if self.coefficients.len() != self.labels.len() {
            return Err(ClassifierError::InvalidArtifact {
                reason: format!(
                    "coefficient rows ({}) do not match labels ({})",
                    self.coefficients.len(),
                    self.labels.len()
                ),
            });
        }

        if self.intercepts.len() != self.labels.len() {
            return Err(ClassifierError::InvalidArtifact {
                reason: format!(
                    "intercepts ({}) do not match labels ({})",
                    self.intercepts.len(),
                    self.labels.len()
                ),
            });
        }

        if let Some(row) = self.coefficients.iter().find(|row| row.len() != dim) {
            return Err(ClassifierError::InvalidArtifact {
                reason: format!(
                    "coefficient row length {} does not match idf dimension {dim}",
                    row.len()
                ),
            });
        }

        Ok(())
    }

    /// Maps text to an L2-normalized tf-idf feature vector.
    ///
    /// Tokens outside the vocabulary are dropped, matching the behavior of a
    /// fitted vectorizer applied to unseen text.
    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut features = vec![0.0f32; self.idf.len()];

        for token in TOKEN_PATTERN.find_iter(text) {
            if let Some(&index) = self.vocabulary.get(token.as_str()) {
                features[index] += 1.0;
            }
        }

        for (value, idf) in features.iter_mut().zip(self.idf.iter()) {
            *value *= idf;
        }

        let norm: f32 = features.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }

        features
    }

    /// Returns the index of the best-scoring label for `features`.
    ///
    /// Ties resolve to the lowest index, keeping prediction deterministic.
    pub fn classify(&self, features: &[f32]) -> usize {
        let mut best_index = 0;
        let mut best_score = f32::NEG_INFINITY;

        for (index, (row, intercept)) in
            self.coefficients.iter().zip(self.intercepts.iter()).enumerate()
        {
            let score: f32 = row
                .iter()
                .zip(features.iter())
                .map(|(w, x)| w * x)
                .sum::<f32>()
                + intercept;

            if score > best_score {
                best_score = score;
                best_index = index;
            }
        }

        best_index
    }

    /// Decodes a class index back to its label.
    pub fn decode(&self, index: usize) -> &str {
        &self.labels[index]
    }
}
