//! Analysis pipeline: PDF text → prompt → LLM → match score → chart.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::chart::render_donut_svg;
use crate::analysis::score::{extract_match_percentage, MatchScore};
use crate::errors::AppError;
use crate::llm_client::prompts::build_analysis_prompt;
use crate::llm_client::TextGenerator;
use crate::pdf::{extract_resume_text, looks_like_pdf};

pub const MISSING_INPUT_MESSAGE: &str =
    "Please provide both a job description and upload your resume.";

/// Validated inputs for one analysis run.
#[derive(Debug)]
pub struct AnalysisInput {
    pub job_description: String,
    pub resume_pdf: Bytes,
}

impl AnalysisInput {
    /// Both inputs are required; a blank job description counts as missing.
    pub fn new(job_description: Option<String>, resume_pdf: Option<Bytes>) -> Result<Self, AppError> {
        let job_description = job_description
            .map(|jd| jd.trim().to_string())
            .filter(|jd| !jd.is_empty());
        let resume_pdf = resume_pdf.filter(|pdf| !pdf.is_empty());

        let (Some(job_description), Some(resume_pdf)) = (job_description, resume_pdf) else {
            return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
        };

        if !looks_like_pdf(&resume_pdf) {
            return Err(AppError::UnsupportedMediaType(
                "Resume must be uploaded as a PDF file".to_string(),
            ));
        }

        Ok(Self {
            job_description,
            resume_pdf,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct InputStats {
    pub job_description_chars: usize,
    pub resume_chars: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    /// Free-text answer from the model, returned as-is.
    pub analysis: String,
    pub match_score: MatchScore,
    pub chart_svg: String,
    pub stats: InputStats,
}

pub async fn run_analysis(
    generator: &dyn TextGenerator,
    input: AnalysisInput,
    fallback_percentage: u8,
) -> Result<AnalysisResponse, AppError> {
    let analysis_id = Uuid::new_v4();
    let AnalysisInput {
        job_description,
        resume_pdf,
    } = input;

    let resume_text = extract_resume_text(resume_pdf).await?;
    let prompt = build_analysis_prompt(&resume_text, &job_description);

    let output = generator
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))?;

    let match_score = extract_match_percentage(&output.text, fallback_percentage);
    info!(
        %analysis_id,
        model = %output.model,
        percentage = match_score.percentage,
        source = ?match_score.source,
        "Analysis complete"
    );

    Ok(AnalysisResponse {
        analysis_id,
        generated_at: Utc::now(),
        model: output.model,
        chart_svg: render_donut_svg(match_score.percentage),
        match_score,
        analysis: output.text,
        stats: InputStats {
            job_description_chars: job_description.chars().count(),
            resume_chars: resume_text.chars().count(),
        },
    })
}
