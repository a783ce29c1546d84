use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;

/// Default sentence-embedding dimension (MiniLM-class models).
pub const SENTENCE_EMBEDDING_DIM: usize = 384;

/// Default max sequence length in tokens.
pub const SENTENCE_MAX_SEQ_LEN: usize = 256;

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct SentenceConfig {
    /// Model directory holding `config.json`, `tokenizer.json`, and
    /// `model.safetensors`.
    pub model_dir: PathBuf,
    /// Max tokens to consider.
    pub max_seq_len: usize,
    /// Output embedding dimension.
    pub embedding_dim: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for SentenceConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: SENTENCE_MAX_SEQ_LEN,
            embedding_dim: SENTENCE_EMBEDDING_DIM,
            testing_stub: false,
        }
    }
}

impl SentenceConfig {
    /// Creates a config for a model directory.
    pub fn new(model_dir: PathBuf) -> Self {
        Self {
            model_dir,
            ..Self::default()
        }
    }

    /// Creates a stub-mode config.
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Self::default()
        }
    }

    /// Path to the model weights file.
    pub fn weights_path(&self) -> PathBuf {
        self.model_dir.join("model.safetensors")
    }

    /// Path to the model config file.
    pub fn model_config_path(&self) -> PathBuf {
        self.model_dir.join("config.json")
    }

    /// Path to `tokenizer.json`.
    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir.join("tokenizer.json")
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be non-zero".to_string(),
            });
        }
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Returns `true` if the model files are present on disk.
    pub fn model_available(&self) -> bool {
        self.weights_path().is_file()
            && self.model_config_path().is_file()
            && self.tokenizer_path().is_file()
    }
}
