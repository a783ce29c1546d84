//! Category classifier (tf-idf + linear model artifact).
//!
//! Use [`ClassifierConfig::stub`] for tests/deployments without an artifact.

pub mod artifact;
pub mod error;


pub use artifact::ClassifierArtifact;
pub use error::ClassifierError;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::text::clean_text;

/// Labels returned by the stub backend.
const STUB_LABELS: &[&str] = &[
    "Software Engineering",
    "Data Science",
    "UI/UX Design",
    "Digital Marketing",
    "Finance",
];

#[derive(Debug, Clone)]
/// Configuration for [`CategoryClassifier`].
pub struct ClassifierConfig {
    /// Path to the JSON artifact.
    pub artifact_path: PathBuf,
    /// Apply [`clean_text`] before vectorizing (in addition to lowercasing).
    pub clean_input: bool,
    /// If true, run in deterministic stub mode (no artifact required).
    pub testing_stub: bool,
}

impl ClassifierConfig {
    /// Creates a config for an artifact at `artifact_path`.
    pub fn new(artifact_path: PathBuf) -> Self {
        Self {
            artifact_path,
            clean_input: false,
            testing_stub: false,
        }
    }

    /// Creates a stub-mode config.
    pub fn stub() -> Self {
        Self {
            artifact_path: PathBuf::new(),
            clean_input: false,
            testing_stub: true,
        }
    }

    /// Sets whether input is cleaned before vectorizing.
    pub fn clean_input(mut self, clean_input: bool) -> Self {
        self.clean_input = clean_input;
        self
    }
}

enum ClassifierBackend {
    Model(ClassifierArtifact),
    Stub,
}

/// Maps free-text profiles to a job category label.
pub struct CategoryClassifier {
    backend: ClassifierBackend,
    config: ClassifierConfig,
}

impl std::fmt::Debug for CategoryClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryClassifier")
            .field(
                "backend",
                &match &self.backend {
                    ClassifierBackend::Model(a) => format!("Model({} labels)", a.labels.len()),
                    ClassifierBackend::Stub => "Stub".to_string(),
                },
            )
            .field("clean_input", &self.config.clean_input)
            .finish()
    }
}

impl CategoryClassifier {
    /// Loads the classifier from a config (stub mode is supported).
    pub fn load(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        if config.testing_stub {
            warn!("Category classifier running in STUB mode (testing only)");
            return Ok(Self {
                backend: ClassifierBackend::Stub,
                config,
            });
        }

        let artifact = ClassifierArtifact::load(&config.artifact_path)?;

        info!(
            artifact_path = %config.artifact_path.display(),
            labels = artifact.labels.len(),
            vocabulary = artifact.vocabulary.len(),
            "Category classifier loaded"
        );

        Ok(Self {
            backend: ClassifierBackend::Model(artifact),
            config,
        })
    }

    /// Predicts the job category for `text`.
    ///
    /// Input is lowercased before feature extraction; the full cleaning pass
    /// runs first when `clean_input` is set.
    pub fn predict(&self, text: &str) -> Result<String, ClassifierError> {
        let text = if self.config.clean_input {
            clean_text(text)
        } else {
            text.to_lowercase()
        };

        match &self.backend {
            ClassifierBackend::Model(artifact) => {
                let features = artifact.vectorize(&text);
                let index = artifact.classify(&features);
                Ok(artifact.decode(index).to_string())
            }
            ClassifierBackend::Stub => Ok(Self::stub_label(&text).to_string()),
        }
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, ClassifierBackend::Stub)
    }

    /// Returns the classifier configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    fn stub_label(text: &str) -> &'static str {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        STUB_LABELS[(hasher.finish() % STUB_LABELS.len() as u64) as usize]
    }
}
