//! The fixed catalogue of external listings used when no `jobs` collection
//! has been stored yet.
//!
//! Ids and timestamps are hard-coded so that seeding twice yields identical
//! snapshots.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::job::{InterviewStatus, Job, JobSource};

fn posted(year: i32, month: u32, day: u32) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(year, month, day, 9, 0, 0)
    .single()
    .unwrap_or_default()
}

fn skills(list: &[&str]) -> Vec<String> {
  list.iter().map(|s| (*s).to_owned()).collect()
}

/// The seed listings, newest first.
pub fn jobs() -> Vec<Job> {
  vec![
    Job {
      id:               Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0001),
      source:           JobSource::LinkedIn,
      title:            "Frontend Developer".into(),
      company:          "TechCorp Solutions".into(),
      description:      "Build responsive single-page applications with a \
                         component library shared across products."
        .into(),
      skills:           skills(&["React", "TypeScript", "CSS", "REST APIs"]),
      experience:       2,
      openings_total:   3,
      openings_left:    3,
      filled:           0,
      posted_by:        "external".into(),
      referral_code:    None,
      source_referral:  Some("LI-TC-2024".into()),
      blocked:          false,
      interview_status: InterviewStatus::Open,
      posted_at:        posted(2024, 3, 18),
    },
    Job {
      id:               Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0002),
      source:           JobSource::Indeed,
      title:            "Backend Engineer".into(),
      company:          "DataFlow Inc".into(),
      description:      "Design and operate the services behind our ingestion \
                         pipeline."
        .into(),
      skills:           skills(&["Node.js", "PostgreSQL", "Docker", "AWS"]),
      experience:       3,
      openings_total:   2,
      openings_left:    2,
      filled:           0,
      posted_by:        "external".into(),
      referral_code:    None,
      source_referral:  Some("IND-DF-7731".into()),
      blocked:          false,
      interview_status: InterviewStatus::Open,
      posted_at:        posted(2024, 3, 15),
    },
    Job {
      id:               Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0003),
      source:           JobSource::Naukri,
      title:            "Data Analyst".into(),
      company:          "Insight Analytics".into(),
      description:      "Turn product telemetry into weekly dashboards and ad \
                         hoc studies."
        .into(),
      skills:           skills(&["Python", "SQL", "Tableau", "Statistics"]),
      experience:       1,
      openings_total:   2,
      openings_left:    1,
      filled:           1,
      posted_by:        "external".into(),
      referral_code:    None,
      source_referral:  Some("NK-IA-0420".into()),
      blocked:          false,
      interview_status: InterviewStatus::InProgress,
      posted_at:        posted(2024, 3, 11),
    },
    Job {
      id:               Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0004),
      source:           JobSource::Glassdoor,
      title:            "DevOps Engineer".into(),
      company:          "CloudNine Systems".into(),
      description:      "Own CI/CD, infrastructure as code, and on-call \
                         tooling."
        .into(),
      skills:           skills(&["Kubernetes", "Terraform", "Docker", "Linux"]),
      experience:       4,
      openings_total:   1,
      openings_left:    1,
      filled:           0,
      posted_by:        "external".into(),
      referral_code:    None,
      source_referral:  Some("GD-CN-1182".into()),
      blocked:          false,
      interview_status: InterviewStatus::Open,
      posted_at:        posted(2024, 3, 6),
    },
    Job {
      id:               Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0005),
      source:           JobSource::LinkedIn,
      title:            "Machine Learning Engineer".into(),
      company:          "TechCorp Solutions".into(),
      description:      "Ship ranking models from notebook to production."
        .into(),
      skills:           skills(&["Python", "PyTorch", "MLOps", "SQL"]),
      experience:       5,
      openings_total:   1,
      openings_left:    0,
      filled:           1,
      posted_by:        "external".into(),
      referral_code:    None,
      source_referral:  Some("LI-TC-2025".into()),
      blocked:          true,
      interview_status: InterviewStatus::InterviewOver,
      posted_at:        posted(2024, 2, 26),
    },
    Job {
      id:               Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0006),
      source:           JobSource::Indeed,
      title:            "Graduate Software Engineer".into(),
      company:          "Brightpath Labs".into(),
      description:      "Rotational programme across web, mobile, and platform \
                         teams."
        .into(),
      skills:           skills(&["Java", "Git", "Problem Solving"]),
      experience:       0,
      openings_total:   5,
      openings_left:    5,
      filled:           0,
      posted_by:        "external".into(),
      referral_code:    None,
      source_referral:  Some("IND-BP-0001".into()),
      blocked:          false,
      interview_status: InterviewStatus::Open,
      posted_at:        posted(2024, 2, 20),
    },
  ]
}
