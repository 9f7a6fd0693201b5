//! Skill matching between an alumni's skill set and a job's requirements.
//!
//! A job skill is satisfied when, ignoring case, it contains one of the
//! candidate's skills or is contained in one ("react" satisfies "React" and
//! "react developer" satisfies "React"). Blank skills on either side never
//! match anything.

use serde::Serialize;

use crate::job::Job;

fn normalize<S: AsRef<str>>(skills: &[S]) -> Vec<String> {
  skills
    .iter()
    .map(|s| s.as_ref().trim().to_lowercase())
    .filter(|s| !s.is_empty())
    .collect()
}

fn is_satisfied(job_skill: &str, candidate: &[String]) -> bool {
  let needle = job_skill.trim().to_lowercase();
  !needle.is_empty()
    && candidate
      .iter()
      .any(|c| c.contains(needle.as_str()) || needle.contains(c.as_str()))
}

/// The job skills satisfied by `candidate_skills`, in job order.
pub fn matched_skills<'a, J, C>(
  job_skills: &'a [J],
  candidate_skills: &[C],
) -> Vec<&'a str>
where
  J: AsRef<str>,
  C: AsRef<str>,
{
  matched_normalized(job_skills, &normalize(candidate_skills))
}

fn matched_normalized<'a, J: AsRef<str>>(
  job_skills: &'a [J],
  candidate: &[String],
) -> Vec<&'a str> {
  job_skills
    .iter()
    .map(|s| AsRef::<str>::as_ref(s))
    .filter(|skill| is_satisfied(skill, candidate))
    .collect()
}

/// Percentage of `job_skills` satisfied by `candidate_skills`, rounded to
/// the nearest integer. A job with no required skills scores 0.
pub fn match_score<J, C>(job_skills: &[J], candidate_skills: &[C]) -> u8
where
  J: AsRef<str>,
  C: AsRef<str>,
{
  percent(matched_skills(job_skills, candidate_skills).len(), job_skills.len())
}

fn percent(matched: usize, total: usize) -> u8 {
  if total == 0 {
    return 0;
  }
  let pct = (matched as f64 * 100.0 / total as f64).round();
  pct.clamp(0.0, 100.0) as u8
}

// ─── Filtering ───────────────────────────────────────────────────────────────

/// Options for [`filter_by_skill_match`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchFilter {
  /// Drop jobs that no longer accept applications.
  pub exclude_blocked: bool,
  /// Keep jobs that scored 0 instead of dropping them.
  pub show_all:        bool,
}

/// A job paired with its match score for one candidate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredJob<'a> {
  pub score:          u8,
  pub matched_skills: Vec<&'a str>,
  pub job:            &'a Job,
}

/// Score every job against `candidate_skills` and return them best first.
///
/// Jobs with equal scores keep their relative input order.
pub fn filter_by_skill_match<'a, C: AsRef<str>>(
  jobs: &'a [Job],
  candidate_skills: &[C],
  filter: MatchFilter,
) -> Vec<ScoredJob<'a>> {
  let candidate = normalize(candidate_skills);
  let mut scored: Vec<ScoredJob<'a>> = jobs
    .iter()
    .filter(|job| !(filter.exclude_blocked && job.blocked))
    .map(|job| {
      let matched = matched_normalized(&job.skills, &candidate);
      let score = percent(matched.len(), job.skills.len());
      ScoredJob { score, matched_skills: matched, job }
    })
    .filter(|s| filter.show_all || s.score > 0)
    .collect();

  // `sort_by` is stable, which keeps ties in input order.
  scored.sort_by(|a, b| b.score.cmp(&a.score));
  scored
}
