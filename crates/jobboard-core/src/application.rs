//! Applications: an alumni's submission of interest in a job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored application. At most one exists per (`job_id`, `alumni_email`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
  pub id:                 Uuid,
  pub job_id:             Uuid,
  pub alumni_email:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub referral_code_used: Option<String>,
  pub applied_at:         DateTime<Utc>,
}

/// Input to [`crate::JobBoard::apply_to_job`].
/// `id` and `applied_at` are set by the board.
#[derive(Debug, Clone)]
pub struct NewApplication {
  pub job_id:             Uuid,
  pub alumni_email:       String,
  pub referral_code_used: Option<String>,
}

impl NewApplication {
  pub fn new(job_id: Uuid, alumni_email: impl Into<String>) -> Self {
    Self {
      job_id,
      alumni_email: alumni_email.into(),
      referral_code_used: None,
    }
  }

  pub fn with_referral_code(mut self, code: impl Into<String>) -> Self {
    self.referral_code_used = Some(code.into());
    self
  }
}

/// E-mail comparison used for every per-alumni lookup: surrounding
/// whitespace and ASCII case are ignored.
pub fn same_email(a: &str, b: &str) -> bool {
  a.trim().eq_ignore_ascii_case(b.trim())
}
