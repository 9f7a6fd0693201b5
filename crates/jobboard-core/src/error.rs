//! Error types for `jobboard-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("job not found: {0}")]
  JobNotFound(Uuid),

  #[error("job {0} is not accepting applications")]
  JobClosed(Uuid),

  #[error("{email} has already applied to job {job_id}")]
  AlreadyApplied { job_id: Uuid, email: String },

  #[error("{email} has already left feedback for job {job_id}")]
  AlreadyReviewed { job_id: Uuid, email: String },

  #[error("{email} must apply to job {job_id} before leaving feedback")]
  NotApplied { job_id: Uuid, email: String },

  #[error("rating must be between 1 and 5, got {0}")]
  InvalidRating(u8),

  #[error("invalid openings: {0}")]
  InvalidOpenings(String),

  #[error("stored collection {key:?} could not be decoded: {source}")]
  CorruptCollection {
    key:    String,
    #[source]
    source: serde_json::Error,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// True for rejections caused by the caller's input rather than by the
  /// storage layer.
  pub fn is_rejection(&self) -> bool {
    !matches!(
      self,
      Self::CorruptCollection { .. } | Self::Serialization(_) | Self::Storage(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
