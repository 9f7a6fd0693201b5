//! Subcommands and their execution against a [`JobBoard`].

use anyhow::{Context as _, anyhow};
use clap::{ArgAction, Subcommand};
use jobboard_core::{
  JobBoard, analytics,
  application::NewApplication,
  feedback::NewFeedback,
  job::{InterviewStatus, Job, JobSource, NewJob},
  kv::KeyValueStore,
  matching::{self, MatchFilter},
  search::{self, ExperienceBand, JobQuery},
};
use serde_json::{Value, json};
use uuid::Uuid;

// ─── Arguments ───────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Browse and manage job listings.
  #[command(subcommand)]
  Jobs(JobsCommand),

  /// Apply to a job on behalf of an alumni.
  Apply {
    job_id:        Uuid,
    #[arg(long)]
    email:         String,
    #[arg(long)]
    referral_code: Option<String>,
  },

  /// Rate the company behind a job.
  Feedback {
    job_id:   Uuid,
    #[arg(long)]
    email:    String,
    #[arg(long)]
    rating:   u8,
    #[arg(long)]
    title:    Option<String>,
    #[arg(long)]
    comments: Option<String>,
  },

  /// List applications for one job or one alumni.
  Applications {
    #[arg(long, conflicts_with = "email", required_unless_present = "email")]
    job:   Option<Uuid>,
    #[arg(long)]
    email: Option<String>,
  },

  /// List feedback left on a job.
  Feedbacks { job_id: Uuid },

  /// Rank jobs by how well they match a skill set.
  Matches {
    /// Comma-separated skills.
    #[arg(long, value_delimiter = ',', required = true)]
    skills:    Vec<String>,
    /// Include jobs that matched nothing.
    #[arg(long)]
    all:       bool,
    /// Skip jobs that no longer accept applications.
    #[arg(long)]
    open_only: bool,
  },

  /// Dashboard analytics.
  Stats,

  /// Restore the seed listings and delete all applications and feedback.
  Reset,
}

#[derive(Subcommand, Debug)]
pub enum JobsCommand {
  /// Search listings.
  List {
    #[arg(long)]
    search:     Option<String>,
    /// fresher, junior, mid or senior.
    #[arg(long)]
    experience: Option<ExperienceBand>,
    #[arg(long)]
    source:     Option<JobSource>,
    #[arg(long)]
    open_only:  bool,
  },

  /// Show a listing with its rating and application count.
  Show { id: Uuid },

  /// Post a new listing.
  Add {
    #[arg(long)]
    title:         String,
    #[arg(long)]
    company:       String,
    #[arg(long, default_value = "")]
    description:   String,
    /// Comma-separated skills.
    #[arg(long, value_delimiter = ',')]
    skills:        Vec<String>,
    #[arg(long, default_value_t = 0)]
    experience:    u32,
    #[arg(long)]
    openings:      u32,
    #[arg(long, default_value_t = JobSource::User)]
    source:        JobSource,
    #[arg(long, default_value = "")]
    posted_by:     String,
    #[arg(long)]
    referral_code: Option<String>,
  },

  /// Record interview progress (open, in-progress, interview-over).
  Status { id: Uuid, status: InterviewStatus },

  /// Finish interviewing; the job stays closed only if hires were met.
  Conclude {
    id:        Uuid,
    #[arg(long, action = ArgAction::Set)]
    hires_met: bool,
  },

  /// Mark every opening as taken.
  Fill { id: Uuid },

  /// Set the number of openings left.
  Openings { id: Uuid, count: u32 },
}

// ─── Execution ───────────────────────────────────────────────────────────────

fn found(job: Option<Job>, id: Uuid) -> anyhow::Result<Job> {
  job.ok_or_else(|| anyhow!("no job with id {id}"))
}

fn to_json<T: serde::Serialize>(value: T) -> anyhow::Result<Value> {
  serde_json::to_value(value).context("failed to encode output")
}

/// Run `command` against `board` and return what should be printed.
pub fn execute<S: KeyValueStore>(
  board: &mut JobBoard<S>,
  command: Command,
) -> anyhow::Result<Value> {
  match command {
    Command::Jobs(cmd) => execute_jobs(board, cmd),

    Command::Apply { job_id, email, referral_code } => {
      let mut input = NewApplication::new(job_id, email);
      input.referral_code_used = referral_code;
      to_json(board.apply_to_job(input)?)
    }

    Command::Feedback { job_id, email, rating, title, comments } => {
      let mut input = NewFeedback::new(job_id, email, rating);
      input.title = title;
      input.comments = comments;
      to_json(board.add_feedback(input)?)
    }

    Command::Applications { job, email } => match (job, email) {
      (Some(job_id), _) => to_json(board.applications_for_job(job_id)),
      (None, Some(email)) => to_json(board.user_applications(&email)),
      (None, None) => Err(anyhow!("either --job or --email is required")),
    },

    Command::Feedbacks { job_id } => to_json(board.feedbacks_for_job(job_id)),

    Command::Matches { skills, all, open_only } => {
      let filter = MatchFilter {
        exclude_blocked: open_only,
        show_all:        all,
      };
      to_json(matching::filter_by_skill_match(board.jobs(), &skills, filter))
    }

    Command::Stats => to_json(analytics::summary(board.snapshot())),

    Command::Reset => {
      board.reinitialize()?;
      Ok(json!({ "jobs": board.jobs().len() }))
    }
  }
}

fn execute_jobs<S: KeyValueStore>(
  board: &mut JobBoard<S>,
  command: JobsCommand,
) -> anyhow::Result<Value> {
  match command {
    JobsCommand::List { search: text, experience, source, open_only } => {
      let query = JobQuery {
        text,
        experience,
        source,
        exclude_blocked: open_only,
      };
      to_json(search::search(board.jobs(), &query))
    }

    JobsCommand::Show { id } => {
      let job = found(board.job(id).cloned(), id)?;
      Ok(json!({
        "job":          to_json(&job)?,
        "referral":     job.referral(),
        "rating":       analytics::job_rating(board.feedbacks(), id),
        "applications": board.applications_for_job(id).len(),
      }))
    }

    JobsCommand::Add {
      title,
      company,
      description,
      skills,
      experience,
      openings,
      source,
      posted_by,
      referral_code,
    } => {
      let mut input = NewJob::new(source, title, company, openings).with_skills(skills);
      input.description = description;
      input.experience = experience;
      input.posted_by = posted_by;
      if source.is_external() {
        input.source_referral = referral_code;
      } else {
        input.referral_code = referral_code;
      }
      to_json(board.add_job(input)?)
    }

    JobsCommand::Status { id, status } => {
      to_json(found(board.set_interview_status(id, status)?, id)?)
    }

    JobsCommand::Conclude { id, hires_met } => {
      to_json(found(board.conclude_interviews(id, hires_met)?, id)?)
    }

    JobsCommand::Fill { id } => to_json(found(board.mark_filled(id)?, id)?),

    JobsCommand::Openings { id, count } => {
      to_json(found(board.set_openings_left(id, count)?, id)?)
    }
  }
}
