//! Job types: the postable openings alumni apply to.
//!
//! A job is either an external listing (LinkedIn, Indeed, ...) or a
//! `User`-sourced posting managed locally by an employer. Jobs are never
//! deleted; closing one is a field mutation expressed as a [`JobPatch`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Where a listing came from.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum JobSource {
  LinkedIn,
  Indeed,
  Naukri,
  Glassdoor,
  User,
}

impl JobSource {
  pub const ALL: [JobSource; 5] = [
    Self::LinkedIn,
    Self::Indeed,
    Self::Naukri,
    Self::Glassdoor,
    Self::User,
  ];

  /// External listings are read-only mirrors of another board.
  pub fn is_external(self) -> bool { !matches!(self, Self::User) }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::LinkedIn => "LinkedIn",
      Self::Indeed => "Indeed",
      Self::Naukri => "Naukri",
      Self::Glassdoor => "Glassdoor",
      Self::User => "User",
    }
  }
}

impl fmt::Display for JobSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for JobSource {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|source| source.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("unknown job source: {s:?}"))
  }
}

/// Hiring progress as reported by the poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterviewStatus {
  #[default]
  #[serde(rename = "Open")]
  Open,
  #[serde(rename = "In Progress")]
  InProgress,
  #[serde(rename = "Interview Over")]
  InterviewOver,
}

impl InterviewStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Open => "Open",
      Self::InProgress => "In Progress",
      Self::InterviewOver => "Interview Over",
    }
  }
}

impl fmt::Display for InterviewStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for InterviewStatus {
  type Err = String;

  /// Accepts the display form (`In Progress`) as well as kebab and snake
  /// case (`in-progress`, `interview_over`).
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let folded: String = s
      .trim()
      .chars()
      .filter(|c| c.is_ascii_alphanumeric())
      .map(|c| c.to_ascii_lowercase())
      .collect();
    match folded.as_str() {
      "open" => Ok(Self::Open),
      "inprogress" => Ok(Self::InProgress),
      "interviewover" => Ok(Self::InterviewOver),
      _ => Err(format!("unknown interview status: {s:?}")),
    }
  }
}

// ─── Job ─────────────────────────────────────────────────────────────────────

/// A job opening as stored in the `jobs` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
  pub id:               Uuid,
  pub source:           JobSource,
  pub title:            String,
  pub company:          String,
  pub description:      String,
  /// Required competencies; order carries no meaning for matching.
  pub skills:           Vec<String>,
  /// Years of experience required.
  pub experience:       u32,
  pub openings_total:   u32,
  /// Always within `0..=openings_total`.
  pub openings_left:    u32,
  /// Confirmed hires. Tracked separately from `openings_left`.
  pub filled:           u32,
  pub posted_by:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub referral_code:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_referral:  Option<String>,
  pub blocked:          bool,
  pub interview_status: InterviewStatus,
  pub posted_at:        DateTime<Utc>,
}

impl Job {
  /// The referral code an applicant should quote.
  ///
  /// Locally posted jobs carry `referral_code`; external listings carry
  /// `source_referral`. Either falls back to the other when absent.
  pub fn referral(&self) -> Option<&str> {
    let (primary, fallback) = if self.source.is_external() {
      (&self.source_referral, &self.referral_code)
    } else {
      (&self.referral_code, &self.source_referral)
    };
    primary.as_deref().or(fallback.as_deref())
  }

  /// Whether a new application may be submitted.
  pub fn accepts_applications(&self) -> bool {
    !self.blocked && self.openings_left > 0
  }

  /// Whether the job counts as open for reporting purposes.
  pub fn is_open(&self) -> bool {
    !self.blocked && self.filled < self.openings_total
  }

  /// Consume one opening on behalf of a successful application.
  pub(crate) fn take_opening(&mut self) {
    self.openings_left = self.openings_left.saturating_sub(1);
    self.blocked = self.openings_left == 0;
  }

  /// Merge `patch` into this job.
  ///
  /// The patch is validated as a whole before any field changes, so an
  /// error leaves the job untouched.
  pub fn apply_patch(&mut self, patch: JobPatch) -> Result<()> {
    let total = patch.openings_total.unwrap_or(self.openings_total);
    let left = patch.openings_left.unwrap_or(self.openings_left);
    if total == 0 {
      return Err(Error::InvalidOpenings(
        "a job needs at least one opening".into(),
      ));
    }
    if left > total {
      return Err(Error::InvalidOpenings(format!(
        "{left} openings left exceeds {total} total"
      )));
    }

    let JobPatch {
      source,
      title,
      company,
      description,
      skills,
      experience,
      openings_total,
      openings_left,
      filled,
      posted_by,
      referral_code,
      source_referral,
      blocked,
      interview_status,
    } = patch;

    if let Some(v) = source {
      self.source = v;
    }
    if let Some(v) = title {
      self.title = v;
    }
    if let Some(v) = company {
      self.company = v;
    }
    if let Some(v) = description {
      self.description = v;
    }
    if let Some(v) = skills {
      self.skills = v;
    }
    if let Some(v) = experience {
      self.experience = v;
    }
    if let Some(v) = openings_total {
      self.openings_total = v;
    }
    if let Some(v) = openings_left {
      self.openings_left = v;
    }
    if let Some(v) = filled {
      self.filled = v;
    }
    if let Some(v) = posted_by {
      self.posted_by = v;
    }
    if let Some(v) = referral_code {
      self.referral_code = v;
    }
    if let Some(v) = source_referral {
      self.source_referral = v;
    }
    if let Some(v) = blocked {
      self.blocked = v;
    }
    if let Some(v) = interview_status {
      self.interview_status = v;
    }

    // A job with nothing left to fill cannot be reopened by a patch.
    if self.openings_left == 0 {
      self.blocked = true;
    }
    Ok(())
  }
}

// ─── JobPatch ────────────────────────────────────────────────────────────────

/// A partial update for [`crate::JobBoard::update_job`]. `None` leaves the
/// field as it is; `id` and `posted_at` cannot be changed.
///
/// The referral fields are doubly optional: `Some(None)` (JSON `null`)
/// clears the code, while an absent key keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPatch {
  pub source:           Option<JobSource>,
  pub title:            Option<String>,
  pub company:          Option<String>,
  pub description:      Option<String>,
  pub skills:           Option<Vec<String>>,
  pub experience:       Option<u32>,
  pub openings_total:   Option<u32>,
  pub openings_left:    Option<u32>,
  pub filled:           Option<u32>,
  pub posted_by:        Option<String>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub referral_code:    Option<Option<String>>,
  #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub source_referral:  Option<Option<String>>,
  pub blocked:          Option<bool>,
  pub interview_status: Option<InterviewStatus>,
}

/// Maps a key that is present, including as `null`, to `Some`. Absent keys
/// fall back to the container's `default`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
  D: Deserializer<'de>,
{
  Option::<String>::deserialize(deserializer).map(Some)
}

// ─── NewJob ──────────────────────────────────────────────────────────────────

/// Input to [`crate::JobBoard::add_job`].
///
/// `id` and `posted_at` are assigned by the board. A new job starts with all
/// openings available, nothing filled, unblocked, and interviews `Open`.
#[derive(Debug, Clone)]
pub struct NewJob {
  pub source:          JobSource,
  pub title:           String,
  pub company:         String,
  pub description:     String,
  pub skills:          Vec<String>,
  pub experience:      u32,
  pub openings_total:  u32,
  pub posted_by:       String,
  pub referral_code:   Option<String>,
  pub source_referral: Option<String>,
}

impl NewJob {
  /// Convenience constructor with the free-text and optional fields empty.
  pub fn new(
    source: JobSource,
    title: impl Into<String>,
    company: impl Into<String>,
    openings_total: u32,
  ) -> Self {
    Self {
      source,
      title: title.into(),
      company: company.into(),
      description: String::new(),
      skills: Vec::new(),
      experience: 0,
      openings_total,
      posted_by: String::new(),
      referral_code: None,
      source_referral: None,
    }
  }

  pub fn with_skills<I, S>(mut self, skills: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.skills = skills.into_iter().map(Into::into).collect();
    self
  }

  pub(crate) fn into_job(self, id: Uuid, posted_at: DateTime<Utc>) -> Job {
    Job {
      id,
      source: self.source,
      title: self.title,
      company: self.company,
      description: self.description,
      skills: self.skills,
      experience: self.experience,
      openings_total: self.openings_total,
      openings_left: self.openings_total,
      filled: 0,
      posted_by: self.posted_by,
      referral_code: self.referral_code,
      source_referral: self.source_referral,
      blocked: false,
      interview_status: InterviewStatus::Open,
      posted_at,
    }
  }
}

// ─── Referral codes ──────────────────────────────────────────────────────────

pub const REFERRAL_CODE_LEN: usize = 8;

const REFERRAL_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Largest multiple of the alphabet size that fits in a byte (7 * 36).
const UNBIASED_BYTES: u8 = 252;

/// The code character for a random byte, or `None` for bytes that would
/// skew the distribution.
fn referral_char(byte: u8) -> Option<char> {
  (byte < UNBIASED_BYTES)
    .then(|| REFERRAL_ALPHABET[usize::from(byte) % REFERRAL_ALPHABET.len()] as char)
}

/// Generate an 8-character upper-case base-36 referral code.
pub fn generate_referral_code() -> String {
  let mut code = String::with_capacity(REFERRAL_CODE_LEN);
  let mut bytes = [0u8; REFERRAL_CODE_LEN * 2];
  while code.len() < REFERRAL_CODE_LEN {
    OsRng.fill_bytes(&mut bytes);
    let wanted = REFERRAL_CODE_LEN - code.len();
    code.extend(bytes.iter().filter_map(|b| referral_char(*b)).take(wanted));
  }
  code
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn job() -> Job {
    NewJob::new(JobSource::User, "Backend Engineer", "Acme", 3)
      .into_job(Uuid::nil(), Utc.timestamp_opt(0, 0).unwrap())
  }

  #[test]
  fn interview_status_serializes_as_display_text() {
    let json = serde_json::to_string(&InterviewStatus::InterviewOver).unwrap();
    assert_eq!(json, "\"Interview Over\"");
    let back: InterviewStatus = serde_json::from_str("\"In Progress\"").unwrap();
    assert_eq!(back, InterviewStatus::InProgress);
  }

  #[test]
  fn interview_status_parses_cli_spellings() {
    assert_eq!("in-progress".parse(), Ok(InterviewStatus::InProgress));
    assert_eq!("Interview Over".parse(), Ok(InterviewStatus::InterviewOver));
    assert!("closed".parse::<InterviewStatus>().is_err());
  }

  #[test]
  fn source_parses_case_insensitively() {
    assert_eq!("linkedin".parse(), Ok(JobSource::LinkedIn));
    assert_eq!(" GLASSDOOR ".parse(), Ok(JobSource::Glassdoor));
    assert!("monster".parse::<JobSource>().is_err());
  }

  #[test]
  fn job_json_uses_camel_case_and_omits_missing_referrals() {
    let value = serde_json::to_value(job()).unwrap();
    assert!(value.get("openingsLeft").is_some());
    assert!(value.get("interviewStatus").is_some());
    assert!(value.get("referralCode").is_none());
    assert!(value.get("sourceReferral").is_none());
  }

  #[test]
  fn referral_prefers_the_field_matching_the_source() {
    let mut j = job();
    j.referral_code = Some("LOCAL".into());
    j.source_referral = Some("REMOTE".into());
    assert_eq!(j.referral(), Some("LOCAL"));

    j.source = JobSource::Indeed;
    assert_eq!(j.referral(), Some("REMOTE"));

    j.source_referral = None;
    assert_eq!(j.referral(), Some("LOCAL"));
  }

  #[test]
  fn take_opening_floors_at_zero_and_blocks() {
    let mut j = job();
    j.openings_left = 1;
    j.take_opening();
    assert_eq!(j.openings_left, 0);
    assert!(j.blocked);
    j.take_opening();
    assert_eq!(j.openings_left, 0);
  }

  #[test]
  fn patch_touches_only_named_fields() {
    let mut j = job();
    let before = j.clone();
    j.apply_patch(JobPatch {
      title: Some("Platform Engineer".into()),
      ..JobPatch::default()
    })
    .unwrap();
    assert_eq!(j.title, "Platform Engineer");
    assert_eq!(j.company, before.company);
    assert_eq!(j.openings_left, before.openings_left);
    assert_eq!(j.posted_at, before.posted_at);
  }

  #[test]
  fn rejected_patch_leaves_job_unchanged() {
    let mut j = job();
    let before = j.clone();
    let err = j
      .apply_patch(JobPatch {
        title: Some("changed".into()),
        openings_left: Some(4),
        ..JobPatch::default()
      })
      .unwrap_err();
    assert!(matches!(err, Error::InvalidOpenings(_)));
    assert_eq!(j, before);
  }

  #[test]
  fn patch_to_zero_openings_forces_block() {
    let mut j = job();
    j.apply_patch(JobPatch {
      openings_left: Some(0),
      blocked: Some(false),
      ..JobPatch::default()
    })
    .unwrap();
    assert!(j.blocked);
  }

  #[test]
  fn referral_bytes_map_uniformly() {
    let mut hits = [0usize; 36];
    for byte in 0..=u8::MAX {
      if let Some(c) = referral_char(byte) {
        let i = REFERRAL_ALPHABET.iter().position(|a| *a as char == c).unwrap();
        hits[i] += 1;
      }
    }
    assert!(hits.iter().all(|n| *n == 7));
    assert_eq!(referral_char(251), Some('Z'));
    assert_eq!(referral_char(252), None);
    assert_eq!(referral_char(255), None);
  }

  #[test]
  fn patch_can_clear_referral_codes() {
    let mut j = job();
    j.referral_code = Some("LOCAL".into());
    j.source_referral = Some("REMOTE".into());

    let patch: JobPatch =
      serde_json::from_str(r#"{"referralCode": null, "title": "Platform"}"#).unwrap();
    assert_eq!(patch.referral_code, Some(None));
    assert_eq!(patch.source_referral, None);

    j.apply_patch(patch).unwrap();
    assert_eq!(j.referral_code, None);
    assert_eq!(j.source_referral.as_deref(), Some("REMOTE"));

    j.apply_patch(JobPatch {
      referral_code: Some(Some("NEW".into())),
      ..JobPatch::default()
    })
    .unwrap();
    assert_eq!(j.referral_code.as_deref(), Some("NEW"));
  }

  #[test]
  fn referral_codes_use_the_expected_alphabet() {
    let code = generate_referral_code();
    assert_eq!(code.len(), REFERRAL_CODE_LEN);
    assert!(
      code
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    );
  }
}
