//! BERT sentence-embedding wrapper (safetensors + mean pooling).

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

use super::error::EmbeddingError;

/// A BERT encoder producing mean-pooled sentence embeddings.
pub struct BertForEmbedding {
    bert: BertModel,
    device: Device,
}

impl BertForEmbedding {
    /// Loads a BERT model from `config.json` + `model.safetensors`.
    pub fn load(
        config_path: &Path,
        weights_path: &Path,
        device: &Device,
    ) -> Result<Self, EmbeddingError> {
        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to parse model config: {}", e),
            })?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device).map_err(
                |e| EmbeddingError::ModelLoadFailed {
                    reason: format!("Failed to mmap safetensors: {}", e),
                },
            )?
        };

        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)
        } else {
            BertModel::load(vb, &config)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("Failed to load BERT weights: {}", e),
        })?;

        Ok(Self {
            bert,
            device: device.clone(),
        })
    }

    /// Runs the encoder over one token sequence and mean-pools the hidden
    /// states across the attention mask.
    pub fn encode(&self, token_ids: &[u32], type_ids: &[u32]) -> Result<Vec<f32>, EmbeddingError> {
        let input_ids = Tensor::new(token_ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(type_ids, &self.device)?.unsqueeze(0)?;
        let attention_mask = input_ids.ones_like()?;

        // [1, seq_len, hidden_size]
        let hidden_states = self
            .bert
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // Mean pooling: [1, seq_len, 1] mask keeps the shapes broadcastable.
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden_states.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        let pooled = summed.broadcast_div(&counts)?;

        Ok(pooled.squeeze(0)?.to_vec1::<f32>()?)
    }
}
