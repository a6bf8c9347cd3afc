// Resume analysis: multipart upload → PDF text → Gemini → match score → chart.
// All LLM calls go through the TextGenerator in AppState.

pub mod chart;
pub mod handlers;
pub mod score;
pub mod service;
