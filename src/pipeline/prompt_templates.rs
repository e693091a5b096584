//! Prompt templates for the legal pipelines.
//!
//! Every model-facing string lives here so the orchestrator only composes
//! calls. Builders return owned strings ready for the gateway.

// ═══════════════════════════════════════════════════════════
// Fee estimate
// ═══════════════════════════════════════════════════════════

pub const FEE_ESTIMATOR_SYSTEM: &str = "You are a legal fee estimator for India. \
Breakdown costs (Retainer, Hourly, Flat) in INR. Disclaimer: Not legal advice.";

// ═══════════════════════════════════════════════════════════
// Summarization
// ═══════════════════════════════════════════════════════════

pub const SUMMARIZER_SYSTEM: &str = "You are a legal document summarizer for Indian law. \
Summarize the document clearly and concisely for a non-lawyer.";

/// Fixed answer for a PDF with no text layer. No model call is made.
pub const EMPTY_PDF_RESPONSE: &str = "Error: Empty or scanned PDF.";

pub fn summary_prompt(document_text: &str) -> String {
    format!("Summarize this legal document:\n{document_text}")
}

// ═══════════════════════════════════════════════════════════
// Case analysis
// ═══════════════════════════════════════════════════════════

/// Four labeled sections requested from the model. The answer is returned
/// as-is, never parsed.
pub fn case_analysis_prompt(description: &str, context: &str) -> String {
    format!(
        "Analyze this Indian Legal Case:\n{description}\n\n\
         Context:\n{context}\n\n\
         Provide:\n\
         1. Win Probability (High/Medium/Low)\n\
         2. Key Strengths\n\
         3. Weaknesses\n\
         4. Relevant Acts"
    )
}

// ═══════════════════════════════════════════════════════════
// Chained law lookup
// ═══════════════════════════════════════════════════════════

/// Step 1: name the governing provision only.
pub fn identify_article_prompt(query: &str) -> String {
    format!(
        "Identify the specific Indian Constitution Article, IPC Section, or Act relevant to: \
         '{query}'. Return ONLY the name (e.g., 'Article 21' or 'Section 302 IPC'). \
         Do not add extra text."
    )
}

/// Step 2: official text of the provision named in step 1.
pub fn law_text_prompt(article: &str) -> String {
    format!(
        "Provide the official legal text or a brief formal summary for {article}. \
         Keep it under 40 words."
    )
}

/// Step 3: advice grounded on the query and the provision from step 1.
pub fn advice_prompt(query: &str, article: &str) -> String {
    format!(
        "User Query: {query}\nRelevant Law: {article}\n\n\
         Provide clear, actionable legal advice for the user based on Indian Law."
    )
}

/// Drop quote characters the model tends to wrap names in.
pub fn strip_quotes(text: &str) -> String {
    text.chars().filter(|c| *c != '"' && *c != '\'').collect()
}
