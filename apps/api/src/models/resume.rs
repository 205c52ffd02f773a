use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the candidate is in their career.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Fresher,
    #[serde(alias = "Early Career")]
    EarlyCareer,
    Freelancer,
    #[serde(alias = "Job Switcher")]
    JobSwitcher,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserType::Fresher => "Fresher",
            UserType::EarlyCareer => "Early Career",
            UserType::Freelancer => "Freelancer",
            UserType::JobSwitcher => "Job Switcher",
        })
    }
}

/// Writing tone requested for the generated resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Formal,
    Confident,
    Creative,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tone::Formal => "Formal",
            Tone::Confident => "Confident",
            Tone::Creative => "Creative",
        })
    }
}

/// Visual layout style requested for the generated resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    Minimal,
    Modern,
    Creative,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Layout::Minimal => "Minimal",
            Layout::Modern => "Modern",
            Layout::Creative => "Creative",
        })
    }
}

/// Career details submitted with a single generate action.
///
/// Built fresh from the form on every request and dropped once the prompt
/// has been produced. Free-text fields default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRequest {
    pub user_type: UserType,
    pub job_role: String,
    pub tone: Tone,
    pub layout: Layout,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub projects: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub certifications: String,
    #[serde(default)]
    pub portfolio_url: String,
}

/// The completion text from the last successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub output_text: String,
    pub generated_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(output_text: String) -> Self {
        Self {
            output_text,
            generated_at: Utc::now(),
        }
    }
}
