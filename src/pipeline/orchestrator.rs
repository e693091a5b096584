use serde::Serialize;

use super::extraction::{extract_text_with, PdfExtractor, PdfTextExtractor};
use super::llm::{ChatMessage, ModelGateway};
use super::prompt_templates::{
    advice_prompt, case_analysis_prompt, identify_article_prompt, law_text_prompt,
    strip_quotes, summary_prompt, EMPTY_PDF_RESPONSE, FEE_ESTIMATOR_SYSTEM, SUMMARIZER_SYSTEM,
};
use super::rag::context::truncate_chars;
use super::rag::ContextBuilder;

/// Marker placed in `summary` / `prediction` when the model was consulted.
pub const DONE: &str = "Done";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeEstimate {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfSummary {
    /// Absent when the PDF had no text and the model was not called.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'static str>,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseAnalysis {
    pub prediction: &'static str,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LawAdvice {
    pub article: String,
    pub law_text: String,
    pub advice: String,
}

/// Named pipelines composed from gateway calls.
///
/// Each pipeline is one synchronous sequence: extraction, context build,
/// then model calls in order. Nothing here returns an error; degraded
/// model answers flow through as text.
pub struct LegalOrchestrator {
    gateway: ModelGateway,
    context: ContextBuilder,
    context_cap: usize,
    extractor: Box<dyn PdfExtractor>,
}

impl LegalOrchestrator {
    pub fn new(gateway: ModelGateway, context: ContextBuilder, context_cap: usize) -> Self {
        Self {
            gateway,
            context,
            context_cap,
            extractor: Box::new(PdfTextExtractor),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn PdfExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn retrieval_strategy(&self) -> &'static str {
        self.context.strategy_name()
    }

    /// Single call with the fee-estimator system message.
    pub fn fee_estimate(&self, prompt: &str) -> FeeEstimate {
        tracing::info!(pipeline = "fee_estimate", chars = prompt.chars().count(), "Pipeline started");
        let messages = vec![
            ChatMessage::system(FEE_ESTIMATOR_SYSTEM),
            ChatMessage::user(prompt),
        ];
        FeeEstimate {
            response: self.gateway.complete_default(messages),
        }
    }

    pub fn summarize_pdf(&self, pdf_bytes: &[u8]) -> PdfSummary {
        let text = extract_text_with(self.extractor.as_ref(), pdf_bytes);
        self.summarize_text(&text)
    }

    /// Blank text short-circuits to a fixed answer without a model call.
    pub fn summarize_text(&self, text: &str) -> PdfSummary {
        if text.trim().is_empty() {
            tracing::info!(pipeline = "summary", "No text layer, skipping model call");
            return PdfSummary {
                summary: None,
                response: EMPTY_PDF_RESPONSE.to_string(),
            };
        }

        tracing::info!(pipeline = "summary", chars = text.chars().count(), "Pipeline started");
        let document = truncate_chars(text, self.context_cap);
        let messages = vec![
            ChatMessage::system(SUMMARIZER_SYSTEM),
            ChatMessage::user(summary_prompt(document)),
        ];
        PdfSummary {
            summary: Some(DONE),
            response: self.gateway.complete_default(messages),
        }
    }

    /// Context narrowed against the description, then one bare-string call.
    pub fn analyze_case(&self, description: &str, pdf_bytes: Option<&[u8]>) -> CaseAnalysis {
        let extracted = pdf_bytes
            .map(|bytes| extract_text_with(self.extractor.as_ref(), bytes))
            .unwrap_or_default();

        let context = self
            .context
            .build(description, &extracted, description, self.context_cap);

        tracing::info!(
            pipeline = "case_analysis",
            description_chars = description.chars().count(),
            extracted_chars = extracted.chars().count(),
            context_chars = context.char_len(),
            source = ?context.source(),
            "Context built"
        );

        let prompt = case_analysis_prompt(description, context.as_str());
        CaseAnalysis {
            prediction: DONE,
            response: self.gateway.complete_default(prompt),
        }
    }

    /// Three dependent calls: provision name, its text, then advice.
    /// A degraded first answer is carried forward as the provision name.
    pub fn law_advice(&self, query: &str) -> LawAdvice {
        tracing::info!(pipeline = "law_advice", "Pipeline started");

        let article = strip_quotes(&self.gateway.complete_default(identify_article_prompt(query)));
        tracing::debug!(article = %article, "Provision identified");

        let law_text = self.gateway.complete_default(law_text_prompt(&article));
        let advice = self.gateway.complete_default(advice_prompt(query, &article));

        LawAdvice {
            article,
            law_text,
            advice,
        }
    }
}
