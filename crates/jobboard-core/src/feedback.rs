//! Feedback: an alumni's rating of a company after applying to one of its
//! jobs.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Accepted star ratings.
pub const RATING_RANGE: RangeInclusive<u8> = 1..=5;

/// A stored review. At most one exists per (`job_id`, `alumni_email`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
  pub id:           Uuid,
  pub job_id:       Uuid,
  pub alumni_email: String,
  pub rating:       u8,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub comments:     Option<String>,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::JobBoard::add_feedback`].
/// `id` and `created_at` are set by the board.
#[derive(Debug, Clone)]
pub struct NewFeedback {
  pub job_id:       Uuid,
  pub alumni_email: String,
  pub rating:       u8,
  pub title:        Option<String>,
  pub comments:     Option<String>,
}

impl NewFeedback {
  pub fn new(job_id: Uuid, alumni_email: impl Into<String>, rating: u8) -> Self {
    Self {
      job_id,
      alumni_email: alumni_email.into(),
      rating,
      title: None,
      comments: None,
    }
  }

  pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
    self.comments = Some(comments.into());
    self
  }
}
