//! Aggregates over a board snapshot, recomputed on every call.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Snapshot,
  feedback::Feedback,
  job::{Job, JobSource},
};

/// Open/closed tally over a set of jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobCounts {
  pub total:  usize,
  pub open:   usize,
  pub closed: usize,
}

/// Mean rating and number of reviews for one company.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRating {
  pub average_rating: f64,
  pub count:          usize,
}

/// Everything the admin analytics view shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  pub jobs:                JobCounts,
  pub total_applications:  usize,
  pub average_rating:      f64,
  pub ratings_by_company:  BTreeMap<String, CompanyRating>,
  pub source_distribution: BTreeMap<JobSource, usize>,
}

/// Count jobs, splitting them by [`Job::is_open`].
pub fn counts(jobs: &[Job]) -> JobCounts {
  let open = jobs.iter().filter(|j| j.is_open()).count();
  JobCounts {
    total: jobs.len(),
    open,
    closed: jobs.len() - open,
  }
}

fn mean<I: IntoIterator<Item = u8>>(ratings: I) -> Option<f64> {
  let (sum, n) = ratings
    .into_iter()
    .fold((0u64, 0usize), |(sum, n), r| (sum + u64::from(r), n + 1));
  (n > 0).then(|| sum as f64 / n as f64)
}

/// Mean rating across all feedback; 0 when there is none.
pub fn average_rating(feedbacks: &[Feedback]) -> f64 {
  mean(feedbacks.iter().map(|f| f.rating)).unwrap_or(0.0)
}

/// Mean rating for a single job, or `None` if it has no feedback.
pub fn job_rating(feedbacks: &[Feedback], job_id: Uuid) -> Option<f64> {
  mean(
    feedbacks
      .iter()
      .filter(|f| f.job_id == job_id)
      .map(|f| f.rating),
  )
}

/// Group feedback by the company of the job it refers to. Feedback whose job
/// is unknown is skipped.
pub fn ratings_by_company(
  jobs: &[Job],
  feedbacks: &[Feedback],
) -> BTreeMap<String, CompanyRating> {
  let company_of: BTreeMap<Uuid, &str> =
    jobs.iter().map(|j| (j.id, j.company.as_str())).collect();

  let mut totals: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
  for fb in feedbacks {
    if let Some(&company) = company_of.get(&fb.job_id) {
      let entry = totals.entry(company).or_default();
      entry.0 += u64::from(fb.rating);
      entry.1 += 1;
    }
  }

  totals
    .into_iter()
    .map(|(company, (sum, count))| {
      (company.to_owned(), CompanyRating {
        average_rating: sum as f64 / count as f64,
        count,
      })
    })
    .collect()
}

/// Number of jobs per source. Sources with no jobs are absent.
pub fn source_distribution(jobs: &[Job]) -> BTreeMap<JobSource, usize> {
  let mut dist = BTreeMap::new();
  for job in jobs {
    *dist.entry(job.source).or_insert(0) += 1;
  }
  dist
}

/// Compute every aggregate for `snapshot`.
pub fn summary(snapshot: Snapshot<'_>) -> Summary {
  Summary {
    jobs:                counts(snapshot.jobs),
    total_applications:  snapshot.applications.len(),
    average_rating:      average_rating(snapshot.feedbacks),
    ratings_by_company:  ratings_by_company(snapshot.jobs, snapshot.feedbacks),
    source_distribution: source_distribution(snapshot.jobs),
  }
}
