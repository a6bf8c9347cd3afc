// Prompt templates for resume analysis.
// The answer stays free text; the match percentage is scraped from it afterwards.

/// ATS analysis prompt. Replace `{resume_text}` and `{job_description}` before sending.
pub const ATS_ANALYSIS_PROMPT: &str = r#"You are an expert ATS (Applicant Tracking System) analyzer. Analyze this resume against the job description and provide detailed feedback.

IMPORTANT: Your output should be well formatted and precise. Use aligned bullets and headings. Use emojis to make it more engaging.
Start the MATCH ANALYSIS section with the overall match written as a percentage, for example "Overall Match: 72%".
Then provide the following sections:

## 📊 MATCH ANALYSIS
- Overall compatibility score and reasoning
- Key strengths found in the resume

## 🔍 MISSING KEYWORDS
- Important keywords from job description not found in resume
- Technical skills that should be highlighted

## 📈 SKILL GAPS
- Required skills mentioned in JD but missing from resume
- Recommended certifications or training

## 💡 OPTIMIZATION RECOMMENDATIONS
- Specific changes to improve ATS compatibility
- Suggestions for better keyword integration
- Formatting improvements

## 📝 TAILORED PROFILE SUMMARY
- A professional 2-3 sentence summary optimized for this role
- Include relevant keywords naturally

Resume Content:
{resume_text}

Job Description:
{job_description}

Provide actionable, specific advice to improve the resume's chances of passing ATS systems and catching recruiter attention."#;

/// Fills the analysis template.
///
/// The job description is substituted last so resume text containing the
/// literal `{job_description}` cannot pull in a second copy.
pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    let (head, tail) = ATS_ANALYSIS_PROMPT
        .split_once("{resume_text}")
        .unwrap_or((ATS_ANALYSIS_PROMPT, ""));
    format!(
        "{head}{resume_text}{}",
        tail.replace("{job_description}", job_description)
    )
}
