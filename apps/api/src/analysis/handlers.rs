//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use tracing::{debug, info};

use crate::analysis::chart::render_donut_svg;
use crate::analysis::service::{run_analysis, AnalysisInput, AnalysisResponse};
use crate::errors::AppError;
use crate::state::AppState;

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const RESUME_FIELD: &str = "resume";

/// Raw multipart fields before validation.
#[derive(Debug, Default)]
struct AnalysisForm {
    job_description: Option<String>,
    resume: Option<Bytes>,
    resume_filename: Option<String>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Resume upload exceeds the size limit".to_string())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

/// Collects the known fields; unknown fields are drained and ignored.
async fn read_analysis_form(multipart: &mut Multipart) -> Result<AnalysisForm, AppError> {
    let mut form = AnalysisForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(JOB_DESCRIPTION_FIELD) => {
                form.job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            Some(RESUME_FIELD) => {
                form.resume_filename = field.file_name().map(String::from);
                form.resume = Some(field.bytes().await.map_err(multipart_error)?);
            }
            other => {
                debug!("Ignoring multipart field {other:?}");
                field.bytes().await.map_err(multipart_error)?;
            }
        }
    }

    Ok(form)
}

/// POST /api/v1/analyze
///
/// Multipart form with a `job_description` text field and a `resume` PDF file.
/// Returns the model's analysis, the parsed match score and a donut chart.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let form = read_analysis_form(&mut multipart).await?;
    info!(
        filename = form.resume_filename.as_deref().unwrap_or("<none>"),
        resume_bytes = form.resume.as_ref().map(Bytes::len).unwrap_or(0),
        "Analysis requested"
    );

    let input = AnalysisInput::new(form.job_description, form.resume)?;
    let response = run_analysis(
        state.generator.as_ref(),
        input,
        state.config.fallback_match_percentage,
    )
    .await?;

    Ok(Json(response))
}

/// Any run of ASCII digits is a percentage; values past 100 (even past `u64`) clamp to 100.
fn parse_chart_percentage(raw: &str) -> Option<u8> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = raw.parse::<u64>().map(|v| v.min(100)).unwrap_or(100);
    Some(value as u8)
}

/// GET /api/v1/chart/:percentage
///
/// Standalone SVG donut chart; values above 100 are clamped.
pub async fn handle_chart(Path(percentage): Path<String>) -> Result<impl IntoResponse, AppError> {
    let percentage = parse_chart_percentage(&percentage)
        .ok_or_else(|| AppError::Validation(format!("'{percentage}' is not a percentage")))?;

    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        render_donut_svg(percentage),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_percentage_parsing() {
        assert_eq!(parse_chart_percentage("0"), Some(0));
        assert_eq!(parse_chart_percentage("64"), Some(64));
        assert_eq!(parse_chart_percentage("250"), Some(100));
        assert_eq!(parse_chart_percentage("99999999999999999999999"), Some(100));
        assert_eq!(parse_chart_percentage(""), None);
        assert_eq!(parse_chart_percentage("-5"), None);
        assert_eq!(parse_chart_percentage("high"), None);
    }
}
