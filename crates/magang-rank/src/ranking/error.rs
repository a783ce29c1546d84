use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

pub type RankingResult<T> = Result<T, RankingError>;
