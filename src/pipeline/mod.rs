pub mod extraction;
pub mod rag;
pub mod llm;
pub mod prompt_templates;
pub mod orchestrator;

pub use orchestrator::{CaseAnalysis, FeeEstimate, LawAdvice, LegalOrchestrator, PdfSummary};
