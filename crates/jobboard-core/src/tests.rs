//! Behavioural tests for `JobBoard` over the in-memory store.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
  BoardOptions, Error, FeedbackPolicy, JobBoard,
  analytics,
  application::NewApplication,
  feedback::NewFeedback,
  job::{InterviewStatus, Job, JobPatch, JobSource, NewJob},
  kv::{APPLICATIONS_KEY, FEEDBACKS_KEY, JOBS_KEY, KeyValueStore, MemoryStore},
  seed,
};

fn board() -> JobBoard<MemoryStore> {
  JobBoard::open(MemoryStore::new(), BoardOptions::default()).expect("in-memory board")
}

fn open_board() -> JobBoard<MemoryStore> {
  JobBoard::open(MemoryStore::new(), BoardOptions {
    feedback_policy: FeedbackPolicy::Open,
  })
  .expect("in-memory board")
}

fn post(board: &mut JobBoard<MemoryStore>, openings: u32) -> Job {
  board
    .add_job(
      NewJob::new(JobSource::User, "Backend Engineer", "Acme", openings)
        .with_skills(["Rust", "SQL"]),
    )
    .unwrap()
}

fn stored_jobs(store: &MemoryStore) -> Vec<Job> {
  serde_json::from_str(store.get(JOBS_KEY).expect("jobs key")).unwrap()
}

// ─── Opening ─────────────────────────────────────────────────────────────────

#[test]
fn empty_store_is_seeded_and_persisted() {
  let b = board();
  assert_eq!(b.jobs(), seed::jobs().as_slice());
  assert!(b.applications().is_empty());
  assert!(b.feedbacks().is_empty());

  let store = b.into_store();
  assert_eq!(stored_jobs(&store), seed::jobs());
  assert_eq!(store.get(APPLICATIONS_KEY), None);
  assert_eq!(store.get(FEEDBACKS_KEY), None);
}

#[test]
fn stored_jobs_are_not_reseeded() {
  let mut store = MemoryStore::new();
  store.save(JOBS_KEY, "[]").unwrap();

  let b = JobBoard::open(store, BoardOptions::default()).unwrap();
  assert!(b.jobs().is_empty());
}

#[test]
fn corrupt_collection_is_an_error() {
  let mut store = MemoryStore::new();
  store.save(APPLICATIONS_KEY, "{not json").unwrap();

  let err = JobBoard::open(store, BoardOptions::default()).err().unwrap();
  assert!(matches!(err, Error::CorruptCollection { ref key, .. } if key == APPLICATIONS_KEY));
  assert!(!err.is_rejection());
}

#[test]
fn reopen_and_flush_is_byte_identical() {
  let mut b = open_board();
  let job = post(&mut b, 2);
  b.apply_to_job(NewApplication::new(job.id, "ada@example.com").with_referral_code("X1"))
    .unwrap();
  b.add_feedback(NewFeedback::new(job.id, "ada@example.com", 4).with_comments("good"))
    .unwrap();
  let before = b.into_store();

  let mut reopened = JobBoard::open(before.clone(), BoardOptions::default()).unwrap();
  reopened.flush().unwrap();
  assert_eq!(reopened.into_store(), before);
}

// ─── Jobs ────────────────────────────────────────────────────────────────────

#[test]
fn add_job_prepends_and_persists() {
  let mut b = board();
  let job = post(&mut b, 2);

  assert_eq!(b.jobs()[0].id, job.id);
  assert_eq!(job.openings_left, 2);
  assert_eq!(job.filled, 0);
  assert!(!job.blocked);
  assert_eq!(job.interview_status, InterviewStatus::Open);

  let store = b.into_store();
  assert_eq!(stored_jobs(&store)[0], job);
}

#[test]
fn user_jobs_get_a_referral_code() {
  let mut b = board();
  let job = post(&mut b, 1);
  assert!(job.referral_code.is_some());

  let mut external = NewJob::new(JobSource::Indeed, "QA", "Initech", 1);
  external.source_referral = Some("IND-1".into());
  let job = b.add_job(external).unwrap();
  assert_eq!(job.referral_code, None);
  assert_eq!(job.referral(), Some("IND-1"));
}

#[test]
fn add_job_rejects_zero_openings() {
  let mut b = board();
  let before = b.jobs().len();
  let err = b
    .add_job(NewJob::new(JobSource::User, "Nothing", "Acme", 0))
    .unwrap_err();
  assert!(matches!(err, Error::InvalidOpenings(_)));
  assert_eq!(b.jobs().len(), before);
}

#[test]
fn update_job_merges_fields() {
  let mut b = board();
  let job = post(&mut b, 3);

  let updated = b
    .update_job(job.id, JobPatch {
      description: Some("Own the storage layer".into()),
      filled: Some(1),
      ..JobPatch::default()
    })
    .unwrap()
    .unwrap();

  assert_eq!(updated.description, "Own the storage layer");
  assert_eq!(updated.filled, 1);
  assert_eq!(updated.title, job.title);
  assert_eq!(b.job(job.id), Some(&updated));
}

#[test]
fn update_unknown_job_is_a_no_op() {
  let mut b = board();
  let before = b.jobs().to_vec();
  let result = b
    .update_job(Uuid::new_v4(), JobPatch {
      title: Some("ghost".into()),
      ..JobPatch::default()
    })
    .unwrap();
  assert!(result.is_none());
  assert_eq!(b.jobs(), before.as_slice());
}

#[test]
fn invalid_patch_is_rejected_without_writing() {
  let mut b = board();
  let job = post(&mut b, 2);
  let err = b
    .update_job(job.id, JobPatch {
      openings_left: Some(5),
      ..JobPatch::default()
    })
    .unwrap_err();
  assert!(matches!(err, Error::InvalidOpenings(_)));
  assert_eq!(b.job(job.id), Some(&job));
  assert_eq!(stored_jobs(&b.into_store())[0], job);
}

#[test]
fn lifecycle_helpers() {
  let mut b = board();
  let job = post(&mut b, 3);

  let j = b.set_interview_status(job.id, InterviewStatus::InProgress).unwrap().unwrap();
  assert_eq!(j.interview_status, InterviewStatus::InProgress);

  let j = b.conclude_interviews(job.id, true).unwrap().unwrap();
  assert_eq!(j.interview_status, InterviewStatus::InterviewOver);
  assert!(j.blocked);

  let j = b.conclude_interviews(job.id, false).unwrap().unwrap();
  assert!(!j.blocked);

  let j = b.set_openings_left(job.id, 1).unwrap().unwrap();
  assert_eq!(j.openings_left, 1);
  assert!(!j.blocked);

  let j = b.mark_filled(job.id).unwrap().unwrap();
  assert_eq!(j.openings_left, 0);
  assert!(j.blocked);

  // Nothing left to fill, so hires-not-met cannot reopen it.
  let j = b.conclude_interviews(job.id, false).unwrap().unwrap();
  assert!(j.blocked);

  assert!(b.set_openings_left(job.id, 4).is_err());
  assert!(b.mark_filled(Uuid::new_v4()).unwrap().is_none());
}

// ─── Applications ────────────────────────────────────────────────────────────

#[test]
fn last_opening_blocks_the_job() {
  let mut b = board();
  let job = post(&mut b, 1);

  b.apply_to_job(NewApplication::new(job.id, "ada@example.com")).unwrap();

  let job = b.job(job.id).unwrap().clone();
  assert_eq!(job.openings_left, 0);
  assert!(job.blocked);
  let stored = stored_jobs(&b.into_store());
  assert!(stored.iter().any(|j| j.id == job.id && j.blocked && j.openings_left == 0));
}

#[test]
fn openings_never_go_negative() {
  let mut b = board();
  let job = post(&mut b, 3);

  for n in 0..5 {
    let result = b.apply_to_job(NewApplication::new(job.id, format!("alumni{n}@example.com")));
    let current = b.job(job.id).unwrap();
    assert_eq!(current.blocked, current.openings_left == 0);
    if n < 3 {
      assert!(result.is_ok());
    } else {
      assert!(matches!(result, Err(Error::JobClosed(id)) if id == job.id));
    }
  }
  assert_eq!(b.job(job.id).unwrap().openings_left, 0);
  assert_eq!(b.applications_for_job(job.id).len(), 3);
}

#[test]
fn duplicate_application_is_rejected_without_mutation() {
  let mut b = board();
  let job = post(&mut b, 5);
  b.apply_to_job(NewApplication::new(job.id, "ada@example.com")).unwrap();

  let err = b
    .apply_to_job(NewApplication::new(job.id, " ADA@example.com"))
    .unwrap_err();
  assert!(matches!(err, Error::AlreadyApplied { .. }));
  assert!(err.is_rejection());
  assert_eq!(b.applications().len(), 1);
  assert_eq!(b.job(job.id).unwrap().openings_left, 4);
}

#[test]
fn blocked_job_rejects_applications() {
  let mut b = board();
  let job = post(&mut b, 5);
  b.update_job(job.id, JobPatch {
    blocked: Some(true),
    ..JobPatch::default()
  })
  .unwrap();

  let err = b.apply_to_job(NewApplication::new(job.id, "ada@example.com")).unwrap_err();
  assert!(matches!(err, Error::JobClosed(_)));
  assert!(b.applications().is_empty());
}

#[test]
fn application_to_unknown_job_is_rejected() {
  let mut b = board();
  let err = b
    .apply_to_job(NewApplication::new(Uuid::new_v4(), "ada@example.com"))
    .unwrap_err();
  assert!(matches!(err, Error::JobNotFound(_)));
}

#[test]
fn queries_only_return_matching_entries() {
  let mut b = open_board();
  let a = post(&mut b, 5);
  let c = post(&mut b, 5);

  b.apply_to_job(NewApplication::new(a.id, "ada@example.com")).unwrap();
  b.apply_to_job(NewApplication::new(c.id, "ada@example.com")).unwrap();
  b.apply_to_job(NewApplication::new(c.id, "linus@example.com")).unwrap();
  b.add_feedback(NewFeedback::new(a.id, "grace@example.com", 5)).unwrap();
  b.add_feedback(NewFeedback::new(c.id, "grace@example.com", 3)).unwrap();

  let for_a = b.applications_for_job(a.id);
  assert_eq!(for_a.len(), 1);
  assert!(for_a.iter().all(|app| app.job_id == a.id));
  assert!(b.feedbacks_for_job(c.id).iter().all(|f| f.job_id == c.id));
  assert_eq!(b.user_applications("Ada@Example.com").len(), 2);
  assert!(b.has_applied(c.id, "linus@example.com"));
  assert!(!b.has_applied(a.id, "linus@example.com"));
}

#[test]
fn ids_are_unique_per_collection() {
  let mut b = open_board();
  let mut job_ids = HashSet::new();
  let mut app_ids = HashSet::new();
  let mut fb_ids = HashSet::new();

  for n in 0..20 {
    let job = post(&mut b, 2);
    assert!(job_ids.insert(job.id));
    let email = format!("alumni{n}@example.com");
    app_ids.insert(b.apply_to_job(NewApplication::new(job.id, &email)).unwrap().id);
    fb_ids.insert(b.add_feedback(NewFeedback::new(job.id, &email, 4)).unwrap().id);
  }

  assert_eq!(app_ids.len(), 20);
  assert_eq!(fb_ids.len(), 20);
  let all: HashSet<Uuid> = b.jobs().iter().map(|j| j.id).collect();
  assert_eq!(all.len(), b.jobs().len());
}

// ─── Feedback ────────────────────────────────────────────────────────────────

#[test]
fn feedback_requires_an_application_by_default() {
  let mut b = board();
  let job = post(&mut b, 2);

  let err = b
    .add_feedback(NewFeedback::new(job.id, "ada@example.com", 5))
    .unwrap_err();
  assert!(matches!(err, Error::NotApplied { .. }));

  b.apply_to_job(NewApplication::new(job.id, "ada@example.com")).unwrap();
  let fb = b.add_feedback(NewFeedback::new(job.id, "ada@example.com", 5)).unwrap();
  assert_eq!(b.feedbacks_for_job(job.id), vec![&fb]);
}

#[test]
fn open_policy_accepts_feedback_without_application() {
  let mut b = open_board();
  let job = post(&mut b, 2);
  assert!(b.add_feedback(NewFeedback::new(job.id, "ada@example.com", 2)).is_ok());
}

#[test]
fn duplicate_feedback_is_rejected() {
  let mut b = open_board();
  let job = post(&mut b, 2);
  b.add_feedback(NewFeedback::new(job.id, "ada@example.com", 4)).unwrap();

  let err = b
    .add_feedback(NewFeedback::new(job.id, "ada@example.com", 1))
    .unwrap_err();
  assert!(matches!(err, Error::AlreadyReviewed { .. }));
  assert_eq!(b.feedbacks().len(), 1);
  assert!(b.has_reviewed(job.id, "ada@example.com"));
}

#[test]
fn feedback_for_unknown_job_is_rejected() {
  let mut b = open_board();
  let missing = Uuid::new_v4();
  let err = b
    .add_feedback(NewFeedback::new(missing, "ada@example.com", 4))
    .unwrap_err();
  assert!(matches!(err, Error::JobNotFound(id) if id == missing));
  assert!(b.feedbacks().is_empty());
  assert_eq!(b.into_store().get(FEEDBACKS_KEY), None);
}

#[test]
fn ratings_outside_one_to_five_are_rejected() {
  let mut b = open_board();
  let job = post(&mut b, 2);
  for rating in [0, 6] {
    let err = b
      .add_feedback(NewFeedback::new(job.id, "ada@example.com", rating))
      .unwrap_err();
    assert!(matches!(err, Error::InvalidRating(r) if r == rating));
  }
  assert!(b.feedbacks().is_empty());
}

// ─── Reset & analytics ───────────────────────────────────────────────────────

#[test]
fn reinitialize_restores_seed_and_clears_the_rest() {
  let mut b = open_board();
  let job = post(&mut b, 2);
  b.apply_to_job(NewApplication::new(job.id, "ada@example.com")).unwrap();
  b.add_feedback(NewFeedback::new(job.id, "ada@example.com", 5)).unwrap();

  b.reinitialize().unwrap();
  assert_eq!(b.jobs(), seed::jobs().as_slice());
  assert!(b.applications().is_empty());
  assert!(b.feedbacks().is_empty());

  let store = b.into_store();
  assert_eq!(stored_jobs(&store), seed::jobs());
  assert_eq!(store.get(APPLICATIONS_KEY), None);
  assert_eq!(store.get(FEEDBACKS_KEY), None);
}

#[test]
fn summary_reflects_the_current_snapshot() {
  let mut b = open_board();
  let job = post(&mut b, 1);
  b.apply_to_job(NewApplication::new(job.id, "ada@example.com")).unwrap();
  b.add_feedback(NewFeedback::new(job.id, "ada@example.com", 4)).unwrap();

  let summary = analytics::summary(b.snapshot());
  assert_eq!(summary.jobs.total, seed::jobs().len() + 1);
  assert_eq!(summary.total_applications, 1);
  assert_eq!(summary.average_rating, 4.0);
  assert_eq!(summary.ratings_by_company["Acme"].count, 1);
  assert_eq!(summary.source_distribution[&JobSource::User], 1);
}

// ─── Storage failures ────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("disk full")]
struct DiskFull;

/// Reads always succeed; writes to `failing` fail.
#[derive(Default)]
struct FlakyStore {
  inner:   MemoryStore,
  failing: Option<&'static str>,
}

impl KeyValueStore for FlakyStore {
  type Error = DiskFull;

  fn load(&self, key: &str) -> Result<Option<String>, DiskFull> {
    Ok(self.inner.get(key).map(str::to_owned))
  }

  fn save(&mut self, key: &str, value: &str) -> Result<(), DiskFull> {
    if self.failing == Some(key) {
      return Err(DiskFull);
    }
    let _ = self.inner.save(key, value);
    Ok(())
  }

  fn remove(&mut self, key: &str) -> Result<(), DiskFull> {
    if self.failing == Some(key) {
      return Err(DiskFull);
    }
    let _ = self.inner.remove(key);
    Ok(())
  }
}

/// Reopen `board` with writes to `key` failing.
fn failing_on(
  board: JobBoard<FlakyStore>,
  key: Option<&'static str>,
) -> JobBoard<FlakyStore> {
  let mut store = board.into_store();
  store.failing = key;
  JobBoard::open(store, BoardOptions {
    feedback_policy: FeedbackPolicy::Open,
  })
  .unwrap()
}

fn flaky_board() -> JobBoard<FlakyStore> {
  failing_on(
    JobBoard::open(FlakyStore::default(), BoardOptions::default()).unwrap(),
    None,
  )
}

#[test]
fn storage_failures_surface_as_errors() {
  let mut b = failing_on(flaky_board(), Some(JOBS_KEY));
  let err = b
    .add_job(NewJob::new(JobSource::User, "Backend", "Acme", 1))
    .unwrap_err();
  assert!(matches!(err, Error::Storage(_)));
  assert!(!err.is_rejection());
  assert_eq!(err.to_string(), "storage error: disk full");
}

#[test]
fn failed_job_write_leaves_memory_unchanged() {
  let mut b = failing_on(flaky_board(), Some(JOBS_KEY));
  let before = b.jobs().to_vec();

  assert!(b.add_job(NewJob::new(JobSource::User, "Backend", "Acme", 1)).is_err());
  assert_eq!(b.jobs(), before.as_slice());

  let id = before[0].id;
  assert!(b.mark_filled(id).is_err());
  assert_eq!(b.jobs(), before.as_slice());
}

#[test]
fn failed_opening_write_rolls_back_the_application() {
  let mut b = failing_on(flaky_board(), Some(JOBS_KEY));
  let job = b.jobs()[0].clone();

  let err = b
    .apply_to_job(NewApplication::new(job.id, "ada@example.com"))
    .unwrap_err();
  assert!(matches!(err, Error::Storage(_)));
  assert!(b.applications().is_empty());
  assert!(!b.has_applied(job.id, "ada@example.com"));
  assert_eq!(b.job(job.id).unwrap().openings_left, job.openings_left);

  // Stored applications were restored, so a retry on a healthy store works.
  let mut b = failing_on(b, None);
  assert!(b.applications().is_empty());
  b.apply_to_job(NewApplication::new(job.id, "ada@example.com")).unwrap();
  assert_eq!(b.job(job.id).unwrap().openings_left, job.openings_left - 1);
}

#[test]
fn failed_application_write_changes_nothing() {
  let mut b = failing_on(flaky_board(), Some(APPLICATIONS_KEY));
  let job = b.jobs()[0].clone();

  assert!(b.apply_to_job(NewApplication::new(job.id, "ada@example.com")).is_err());
  assert!(b.applications().is_empty());
  assert_eq!(b.job(job.id), Some(&job));
}

#[test]
fn failed_feedback_write_changes_nothing() {
  let mut b = failing_on(flaky_board(), Some(FEEDBACKS_KEY));
  let job_id = b.jobs()[0].id;

  assert!(b.add_feedback(NewFeedback::new(job_id, "ada@example.com", 5)).is_err());
  assert!(b.feedbacks().is_empty());
  assert!(!b.has_reviewed(job_id, "ada@example.com"));
}

#[test]
fn failed_reset_keeps_memory_in_step_with_the_store() {
  let mut b = flaky_board();
  let job_id = b.jobs()[0].id;
  b.apply_to_job(NewApplication::new(job_id, "ada@example.com")).unwrap();
  b.add_feedback(NewFeedback::new(job_id, "ada@example.com", 5)).unwrap();

  let mut b = failing_on(b, Some(FEEDBACKS_KEY));
  assert!(b.reinitialize().is_err());
  assert!(b.applications().is_empty());
  assert_eq!(b.feedbacks().len(), 1);
  assert_eq!(b.jobs(), seed::jobs().as_slice());

  let store = b.into_store();
  assert_eq!(store.inner.get(APPLICATIONS_KEY), None);
  assert!(store.inner.get(FEEDBACKS_KEY).is_some());
}
