//! Fixtures shared by unit and router tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{GenerationOutput, LlmError, TextGenerator};

/// Builds a one-page PDF that draws `text` in Helvetica. An empty `text`
/// yields a page with no text operators.
pub fn minimal_pdf(text: &str) -> Vec<u8> {
    let content = if text.is_empty() {
        String::new()
    } else {
        let escaped = text
            .replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)");
        format!("BT /F1 12 Tf 72 720 Td ({escaped}) Tj ET")
    };

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    pdf.push_str("0000000000 65535 f \n");
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.into_bytes()
}

/// Canned generator: returns `reply` (or fails when `None`) and records prompts.
pub struct StubGenerator {
    reply: Option<String>,
    pub calls: AtomicU32,
    pub last_prompt: Mutex<Option<String>>,
}

impl StubGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationOutput, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match &self.reply {
            Some(text) => Ok(GenerationOutput {
                text: text.clone(),
                model: "stub-model".to_string(),
            }),
            None => Err(LlmError::AllModelsFailed {
                tried: vec!["stub-model".to_string()],
                last: Box::new(LlmError::Api {
                    status: 429,
                    message: "quota exceeded".to_string(),
                }),
            }),
        }
    }

    async fn ping(&self) -> bool {
        self.reply.is_some()
    }

    fn models(&self) -> Vec<String> {
        vec!["stub-model".to_string()]
    }
}
