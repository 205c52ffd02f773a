//! Resume prompt assembly.
//!
//! The prompt is a fixed frame around the submitted fields. Every field is
//! emitted under its label even when blank, so the model always sees the same
//! section skeleton.

use crate::models::resume::ResumeRequest;

/// Role framing placed at the top of every resume prompt.
pub const RESUME_WRITER_PREAMBLE: &str = "You are an expert resume writer trained in \
ATS-optimized formatting, persuasive writing, and professional branding.";

/// Section order the model is asked to follow.
pub const SECTION_ORDER: [&str; 6] = [
    "Summary",
    "Experience",
    "Education",
    "Skills",
    "Projects",
    "Certifications",
];

/// Builds the generation prompt for a resume request.
///
/// Pure and deterministic: the same request always yields byte-identical text.
/// Field values are inserted verbatim; nothing is validated or trimmed here.
pub fn build_prompt(request: &ResumeRequest) -> String {
    format!(
        r#"
{preamble}

Rewrite the following resume into a clean, concise, and tailored resume for the job role: **{job_role}**.
Use a **{tone}** tone and a **{layout}** layout.

---

User Type: {user_type}

Education:
{education}

Experience:
{experience}

Projects:
{projects}

Skills:
{skills}

Certifications:
{certifications}

Portfolio / LinkedIn:
{portfolio}

Instructions:
- Add a professional summary at the top.
- Use action verbs and measurable outcomes.
- Group skills logically.
- Format into sections: {sections}.
"#,
        preamble = RESUME_WRITER_PREAMBLE,
        job_role = request.job_role,
        tone = request.tone,
        layout = request.layout,
        user_type = request.user_type,
        education = request.education,
        experience = request.experience,
        projects = request.projects,
        skills = request.skills,
        certifications = request.certifications,
        portfolio = request.portfolio_url,
        sections = SECTION_ORDER.join(", "),
    )
}
