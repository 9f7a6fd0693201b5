//! Free-text and facet filtering over job listings.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::job::{Job, JobSource};

/// Coarse seniority buckets over a job's required years of experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceBand {
  /// No prior experience.
  Fresher,
  /// 1–2 years.
  Junior,
  /// 3–5 years.
  Mid,
  /// 6 years or more.
  Senior,
}

impl ExperienceBand {
  pub fn of(years: u32) -> Self {
    match years {
      0 => Self::Fresher,
      1..=2 => Self::Junior,
      3..=5 => Self::Mid,
      _ => Self::Senior,
    }
  }

  pub fn contains(self, years: u32) -> bool { Self::of(years) == self }
}

impl fmt::Display for ExperienceBand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Fresher => "fresher",
      Self::Junior => "junior",
      Self::Mid => "mid",
      Self::Senior => "senior",
    })
  }
}

impl FromStr for ExperienceBand {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "fresher" | "entry" => Ok(Self::Fresher),
      "junior" => Ok(Self::Junior),
      "mid" => Ok(Self::Mid),
      "senior" => Ok(Self::Senior),
      other => Err(format!("unknown experience band: {other:?}")),
    }
  }
}

/// Parameters for [`search`]. The default query matches every job.
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
  /// Case-insensitive text matched against title, company, description,
  /// poster, and skills.
  pub text:            Option<String>,
  pub experience:      Option<ExperienceBand>,
  pub source:          Option<JobSource>,
  /// Drop jobs that are blocked.
  pub exclude_blocked: bool,
}

impl JobQuery {
  pub fn matches(&self, job: &Job) -> bool {
    if self.exclude_blocked && job.blocked {
      return false;
    }
    if self.source.is_some_and(|s| s != job.source) {
      return false;
    }
    if self.experience.is_some_and(|band| !band.contains(job.experience)) {
      return false;
    }
    match self.text.as_deref().map(str::trim) {
      None | Some("") => true,
      Some(text) => text_matches(job, &text.to_lowercase()),
    }
  }
}

fn text_matches(job: &Job, needle: &str) -> bool {
  [&job.title, &job.company, &job.description, &job.posted_by]
    .into_iter()
    .chain(job.skills.iter())
    .any(|field| field.to_lowercase().contains(needle))
}

/// Jobs matching `query`, in input order.
pub fn search<'a>(jobs: &'a [Job], query: &JobQuery) -> Vec<&'a Job> {
  jobs.iter().filter(|job| query.matches(job)).collect()
}
