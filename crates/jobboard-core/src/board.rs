//! [`JobBoard`], the in-memory state store mirrored into a
//! [`KeyValueStore`].
//!
//! The board owns the `jobs`, `applications`, and `feedbacks` collections for
//! the lifetime of a session. Every mutation validates first, then writes
//! each touched collection back in full, and only then updates memory. A
//! rejected operation never writes anything, and a failed write leaves the
//! in-memory collections as they were.

use chrono::Utc;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  application::{Application, NewApplication, same_email},
  feedback::{Feedback, NewFeedback, RATING_RANGE},
  job::{InterviewStatus, Job, JobPatch, JobSource, NewJob, generate_referral_code},
  kv::{APPLICATIONS_KEY, FEEDBACKS_KEY, JOBS_KEY, KeyValueStore},
  seed,
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Whether feedback requires a prior application from the same alumni.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackPolicy {
  #[default]
  RequireApplication,
  Open,
}

/// Behavioural switches for a [`JobBoard`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardOptions {
  #[serde(default)]
  pub feedback_policy: FeedbackPolicy,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// A borrowed view of all three collections, for the pure query functions in
/// [`crate::analytics`], [`crate::matching`], and [`crate::search`].
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
  pub jobs:         &'a [Job],
  pub applications: &'a [Application],
  pub feedbacks:    &'a [Feedback],
}

// ─── Persistence helpers ─────────────────────────────────────────────────────

fn storage_error<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Storage(Box::new(e))
}

fn load_collection<S, T>(store: &S, key: &str) -> Result<Option<Vec<T>>>
where
  S: KeyValueStore,
  T: DeserializeOwned,
{
  let Some(raw) = store.load(key).map_err(storage_error)? else {
    return Ok(None);
  };
  serde_json::from_str(&raw)
    .map(Some)
    .map_err(|source| Error::CorruptCollection { key: key.to_owned(), source })
}

fn save_collection<S, T>(store: &mut S, key: &str, items: &[T]) -> Result<()>
where
  S: KeyValueStore,
  T: Serialize,
{
  let raw = serde_json::to_string(items)?;
  store.save(key, &raw).map_err(storage_error)
}

/// A v4 UUID not already used by `taken`.
fn fresh_id(taken: impl Fn(Uuid) -> bool) -> Uuid {
  loop {
    let id = Uuid::new_v4();
    if !taken(id) {
      return id;
    }
  }
}

// ─── Board ───────────────────────────────────────────────────────────────────

/// The job board's state store.
///
/// Construct one per session with [`JobBoard::open`] and pass it to whatever
/// needs it; [`JobBoard::into_store`] ends the session and hands the backend
/// back.
pub struct JobBoard<S: KeyValueStore> {
  store:        S,
  options:      BoardOptions,
  jobs:         Vec<Job>,
  applications: Vec<Application>,
  feedbacks:    Vec<Feedback>,
}

impl<S: KeyValueStore> JobBoard<S> {
  /// Load the board from `store`.
  ///
  /// A missing `jobs` collection is seeded from [`seed::jobs`] and written
  /// back; missing `applications` or `feedbacks` start empty. A collection
  /// that exists but cannot be decoded is an error rather than a reseed.
  pub fn open(mut store: S, options: BoardOptions) -> Result<Self> {
    let jobs: Vec<Job> = match load_collection(&store, JOBS_KEY)? {
      Some(jobs) => jobs,
      None => {
        let jobs = seed::jobs();
        info!(count = jobs.len(), "no stored jobs; seeding catalogue");
        save_collection(&mut store, JOBS_KEY, &jobs)?;
        jobs
      }
    };
    let applications: Vec<Application> =
      load_collection(&store, APPLICATIONS_KEY)?.unwrap_or_default();
    let feedbacks: Vec<Feedback> =
      load_collection(&store, FEEDBACKS_KEY)?.unwrap_or_default();

    debug!(
      jobs = jobs.len(),
      applications = applications.len(),
      feedbacks = feedbacks.len(),
      "job board loaded"
    );

    Ok(Self { store, options, jobs, applications, feedbacks })
  }

  /// End the session and return the backend.
  pub fn into_store(self) -> S { self.store }

  pub fn options(&self) -> BoardOptions { self.options }

  pub fn jobs(&self) -> &[Job] { &self.jobs }

  pub fn applications(&self) -> &[Application] { &self.applications }

  pub fn feedbacks(&self) -> &[Feedback] { &self.feedbacks }

  pub fn snapshot(&self) -> Snapshot<'_> {
    Snapshot {
      jobs:         &self.jobs,
      applications: &self.applications,
      feedbacks:    &self.feedbacks,
    }
  }

  // ── Persistence ───────────────────────────────────────────────────────────

  /// Write all three collections as they are in memory.
  pub fn flush(&mut self) -> Result<()> {
    save_collection(&mut self.store, JOBS_KEY, &self.jobs)?;
    save_collection(&mut self.store, APPLICATIONS_KEY, &self.applications)?;
    save_collection(&mut self.store, FEEDBACKS_KEY, &self.feedbacks)
  }

  // ── Jobs ──────────────────────────────────────────────────────────────────

  fn job_index(&self, id: Uuid) -> Option<usize> {
    self.jobs.iter().position(|j| j.id == id)
  }

  /// Post a new job. It is placed first in the listing.
  ///
  /// A `User`-sourced job posted without a referral code is given one.
  pub fn add_job(&mut self, mut input: NewJob) -> Result<Job> {
    if input.openings_total == 0 {
      warn!(title = %input.title, "rejected job without openings");
      return Err(Error::InvalidOpenings(
        "a job needs at least one opening".into(),
      ));
    }
    if input.source == JobSource::User && input.referral_code.is_none() {
      input.referral_code = Some(generate_referral_code());
    }

    let id = fresh_id(|id| self.job_index(id).is_some());
    let job = input.into_job(id, Utc::now());

    let mut jobs = Vec::with_capacity(self.jobs.len() + 1);
    jobs.push(job.clone());
    jobs.extend_from_slice(&self.jobs);
    save_collection(&mut self.store, JOBS_KEY, &jobs)?;
    self.jobs = jobs;

    info!(job_id = %job.id, title = %job.title, company = %job.company, "job posted");
    Ok(job)
  }

  /// Merge `patch` into the job with `id`.
  ///
  /// Returns `None`, writing nothing, if no such job exists.
  pub fn update_job(&mut self, id: Uuid, patch: JobPatch) -> Result<Option<Job>> {
    let Some(index) = self.job_index(id) else {
      debug!(job_id = %id, "update for unknown job ignored");
      return Ok(None);
    };

    let mut updated = self.jobs[index].clone();
    updated.apply_patch(patch)?;

    let mut jobs = self.jobs.clone();
    jobs[index] = updated.clone();
    save_collection(&mut self.store, JOBS_KEY, &jobs)?;
    self.jobs = jobs;

    info!(job_id = %id, blocked = updated.blocked, openings_left = updated.openings_left, "job updated");
    Ok(Some(updated))
  }

  /// Record the poster's interview progress.
  pub fn set_interview_status(
    &mut self,
    id: Uuid,
    status: InterviewStatus,
  ) -> Result<Option<Job>> {
    self.update_job(id, JobPatch {
      interview_status: Some(status),
      ..JobPatch::default()
    })
  }

  /// Close out interviewing. When the required hires were made the job is
  /// blocked; otherwise it is reopened, provided openings remain.
  pub fn conclude_interviews(&mut self, id: Uuid, hires_met: bool) -> Result<Option<Job>> {
    self.update_job(id, JobPatch {
      interview_status: Some(InterviewStatus::InterviewOver),
      blocked: Some(hires_met),
      ..JobPatch::default()
    })
  }

  /// Mark every opening as taken and stop accepting applications.
  pub fn mark_filled(&mut self, id: Uuid) -> Result<Option<Job>> {
    self.update_job(id, JobPatch {
      openings_left: Some(0),
      blocked: Some(true),
      ..JobPatch::default()
    })
  }

  /// Set the remaining openings directly. The job is blocked exactly when
  /// `openings_left` is 0.
  pub fn set_openings_left(&mut self, id: Uuid, openings_left: u32) -> Result<Option<Job>> {
    self.update_job(id, JobPatch {
      openings_left: Some(openings_left),
      blocked: Some(openings_left == 0),
      ..JobPatch::default()
    })
  }

  // ── Applications ──────────────────────────────────────────────────────────

  /// Submit an application and consume one of the job's openings.
  ///
  /// Rejected if the job is unknown, if this alumni already applied, or if
  /// the job is not accepting applications.
  pub fn apply_to_job(&mut self, input: NewApplication) -> Result<Application> {
    let job_id = input.job_id;
    let Some(index) = self.job_index(job_id) else {
      warn!(job_id = %job_id, "application for unknown job");
      return Err(Error::JobNotFound(job_id));
    };
    if self.has_applied(job_id, &input.alumni_email) {
      warn!(job_id = %job_id, email = %input.alumni_email, "duplicate application");
      return Err(Error::AlreadyApplied { job_id, email: input.alumni_email });
    }
    if !self.jobs[index].accepts_applications() {
      warn!(job_id = %job_id, "application for closed job");
      return Err(Error::JobClosed(job_id));
    }

    let id = fresh_id(|id| self.applications.iter().any(|a| a.id == id));
    let application = Application {
      id,
      job_id,
      alumni_email: input.alumni_email.trim().to_owned(),
      referral_code_used: input.referral_code_used,
      applied_at: Utc::now(),
    };
    let mut applications = self.applications.clone();
    applications.push(application.clone());
    save_collection(&mut self.store, APPLICATIONS_KEY, &applications)?;

    let mut jobs = self.jobs.clone();
    jobs[index].take_opening();
    if let Err(e) = save_collection(&mut self.store, JOBS_KEY, &jobs) {
      // Put back the applications that match memory.
      if let Err(undo) = save_collection(&mut self.store, APPLICATIONS_KEY, &self.applications) {
        warn!(job_id = %job_id, error = %undo, "failed to roll back stored applications");
      }
      return Err(e);
    }
    self.applications = applications;
    self.jobs = jobs;

    let job = &self.jobs[index];
    info!(
      job_id = %job_id,
      application_id = %application.id,
      openings_left = job.openings_left,
      blocked = job.blocked,
      "application submitted"
    );
    Ok(application)
  }

  pub fn has_applied(&self, job_id: Uuid, email: &str) -> bool {
    self
      .applications
      .iter()
      .any(|a| a.job_id == job_id && same_email(&a.alumni_email, email))
  }

  // ── Feedback ──────────────────────────────────────────────────────────────

  /// Record an alumni's rating of a job's company.
  ///
  /// Rejected if the rating is outside 1–5, the job is unknown, this alumni
  /// already left feedback, or (under [`FeedbackPolicy::RequireApplication`])
  /// the alumni never applied.
  pub fn add_feedback(&mut self, input: NewFeedback) -> Result<Feedback> {
    let job_id = input.job_id;
    if !RATING_RANGE.contains(&input.rating) {
      warn!(job_id = %job_id, rating = input.rating, "rating out of range");
      return Err(Error::InvalidRating(input.rating));
    }
    if self.job_index(job_id).is_none() {
      warn!(job_id = %job_id, "feedback for unknown job");
      return Err(Error::JobNotFound(job_id));
    }
    if self.has_reviewed(job_id, &input.alumni_email) {
      warn!(job_id = %job_id, email = %input.alumni_email, "duplicate feedback");
      return Err(Error::AlreadyReviewed { job_id, email: input.alumni_email });
    }
    if self.options.feedback_policy == FeedbackPolicy::RequireApplication
      && !self.has_applied(job_id, &input.alumni_email)
    {
      warn!(job_id = %job_id, email = %input.alumni_email, "feedback without application");
      return Err(Error::NotApplied { job_id, email: input.alumni_email });
    }

    let id = fresh_id(|id| self.feedbacks.iter().any(|f| f.id == id));
    let feedback = Feedback {
      id,
      job_id,
      alumni_email: input.alumni_email.trim().to_owned(),
      rating: input.rating,
      title: input.title,
      comments: input.comments,
      created_at: Utc::now(),
    };
    let mut feedbacks = self.feedbacks.clone();
    feedbacks.push(feedback.clone());
    save_collection(&mut self.store, FEEDBACKS_KEY, &feedbacks)?;
    self.feedbacks = feedbacks;

    info!(job_id = %job_id, feedback_id = %feedback.id, rating = feedback.rating, "feedback recorded");
    Ok(feedback)
  }

  pub fn has_reviewed(&self, job_id: Uuid, email: &str) -> bool {
    self
      .feedbacks
      .iter()
      .any(|f| f.job_id == job_id && same_email(&f.alumni_email, email))
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn job(&self, id: Uuid) -> Option<&Job> {
    self.jobs.iter().find(|j| j.id == id)
  }

  pub fn applications_for_job(&self, job_id: Uuid) -> Vec<&Application> {
    self.applications.iter().filter(|a| a.job_id == job_id).collect()
  }

  pub fn feedbacks_for_job(&self, job_id: Uuid) -> Vec<&Feedback> {
    self.feedbacks.iter().filter(|f| f.job_id == job_id).collect()
  }

  pub fn user_applications(&self, email: &str) -> Vec<&Application> {
    self
      .applications
      .iter()
      .filter(|a| same_email(&a.alumni_email, email))
      .collect()
  }

  // ── Reset ─────────────────────────────────────────────────────────────────

  /// Restore the seed catalogue and drop every application and review.
  ///
  /// Each collection is reset in memory only once its stored copy has been
  /// replaced, so an error part-way leaves memory matching the store.
  pub fn reinitialize(&mut self) -> Result<()> {
    let jobs = seed::jobs();
    save_collection(&mut self.store, JOBS_KEY, &jobs)?;
    self.jobs = jobs;

    self.store.remove(APPLICATIONS_KEY).map_err(storage_error)?;
    self.applications.clear();

    self.store.remove(FEEDBACKS_KEY).map_err(storage_error)?;
    self.feedbacks.clear();

    info!(jobs = self.jobs.len(), "job board reset to seed data");
    Ok(())
  }
}
