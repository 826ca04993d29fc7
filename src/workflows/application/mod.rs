//! Cover letter drafting: reference documents from Drive, optional profile
//! enrichment, and chat-completion prompts, composed by the assistant.

pub mod assistant;
pub mod catalog;
pub mod docx;
pub mod drive;
pub mod generation;
pub mod profile;
pub mod prompts;

pub use assistant::{
    document_link, document_title, ApplicationOutcome, AssistantError, JobApplicationAssistant,
};
pub use catalog::{render_listing, render_reference_checks, DocumentCatalog, ReferenceCheck};
pub use drive::{
    DocumentFetch, DocumentId, DocumentStore, DocumentSummary, DriveError, GoogleDriveClient,
};
pub use generation::{CompletionBackend, CoverLetterWriter, GenerationError, OpenAiCompletions};
pub use profile::{
    CompanyConnection, ExperienceEntry, ProfileClient, ProfileSignal, ProfileSource,
    Recommendation,
};
pub use prompts::format_profile_block;
