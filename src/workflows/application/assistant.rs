use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use super::drive::{DocumentFetch, DocumentId, DocumentStore, DriveError, GoogleDriveClient};
use super::generation::{CoverLetterWriter, GenerationError, OpenAiCompletions};
use super::profile::{CompanyConnection, ProfileClient, ProfileSignal, ProfileSource};
use crate::config::{AppConfig, ConfigError, ReferenceDocumentIds};
use crate::error::AppError;

/// Successful run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationOutcome {
    pub analysis: Option<String>,
    pub cover_letter: String,
    pub document_id: DocumentId,
    pub title: String,
    pub link: String,
    pub profile_enriched: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("could not download reference documents ({0})")]
    MissingReferenceDocuments(String),
    #[error("cover letter generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("saving cover letter failed: {0}")]
    Upload(#[source] DriveError),
}

struct ReferenceDocuments {
    resume: String,
    prior_letter: String,
}

#[derive(Default)]
struct Enrichment {
    profile: Option<ProfileSignal>,
    connections: Option<Vec<CompanyConnection>>,
}

#[derive(Debug)]
pub struct JobApplicationAssistant {
    documents: Box<dyn DocumentStore>,
    writer: CoverLetterWriter,
    profile: Option<Box<dyn ProfileSource>>,
    references: ReferenceDocumentIds,
}

impl JobApplicationAssistant {
    pub fn new(
        documents: Box<dyn DocumentStore>,
        writer: CoverLetterWriter,
        profile: Option<Box<dyn ProfileSource>>,
        references: ReferenceDocumentIds,
    ) -> Self {
        Self {
            documents,
            writer,
            profile,
            references,
        }
    }

    /// Wires the production clients. The profile feature is disabled, not
    /// fatal, when its credentials are missing.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let references = config.documents.reference_ids()?;
        let writer = CoverLetterWriter::new(Box::new(OpenAiCompletions::from_config(
            &config.generation,
        )?));
        let profile = ProfileClient::from_config(&config.profile);
        let documents = GoogleDriveClient::authenticate(&config.drive)?;

        Ok(Self::with_profile_client(
            Box::new(documents),
            writer,
            profile,
            references,
        ))
    }

    /// Same as [`Self::new`], but takes the outcome of building the profile
    /// client. A configuration error leaves profile enrichment disabled.
    pub fn with_profile_client(
        documents: Box<dyn DocumentStore>,
        writer: CoverLetterWriter,
        profile: Result<ProfileClient, ConfigError>,
        references: ReferenceDocumentIds,
    ) -> Self {
        Self::new(documents, writer, optional_profile(profile), references)
    }

    pub fn profile_enabled(&self) -> bool {
        self.profile.is_some()
    }

    /// Runs the whole workflow, printing progress, and reports whether a new
    /// cover letter was saved.
    pub fn generate_application_documents(&self, job_description: &str) -> bool {
        match self.run(job_description) {
            Ok(outcome) => {
                println!("\nCover letter saved to Google Drive:");
                println!("Title: {}", outcome.title);
                println!("File ID: {}", outcome.document_id);
                println!("Document Link: {}", outcome.link);
                println!("\nDone! Your new cover letter has been generated and saved.");
                true
            }
            Err(err) => {
                warn!(error = %err, "cover letter workflow aborted");
                println!("\nError: {err}");
                println!("No cover letter was saved.");
                false
            }
        }
    }

    pub fn run(&self, job_description: &str) -> Result<ApplicationOutcome, AssistantError> {
        println!("\nAnalyzing job description...");
        let analysis = match self.writer.analyze_job_description(job_description) {
            Ok(analysis) => {
                println!("\nJob Requirements Analysis:\n{analysis}");
                Some(analysis)
            }
            Err(err) => {
                warn!(error = %err, "job description analysis failed; continuing");
                println!("\nJob description analysis unavailable: {err}");
                None
            }
        };

        println!("\nDownloading your reference documents from Google Drive...");
        let references = self.fetch_references()?;

        let enrichment = self.enrich(job_description);
        let profile_enriched = enrichment.profile.is_some();

        println!("\nGenerating new cover letter...");
        let cover_letter = self.writer.generate_cover_letter(
            job_description,
            &references.resume,
            &references.prior_letter,
            enrichment.profile.as_ref(),
            enrichment.connections.as_deref(),
        )?;

        let title = document_title(Local::now().naive_local());
        let document_id = self
            .documents
            .save_document(&cover_letter, &title)
            .map_err(AssistantError::Upload)?;
        info!(%document_id, %title, "cover letter saved");

        Ok(ApplicationOutcome {
            analysis,
            link: document_link(&document_id),
            cover_letter,
            document_id,
            title,
            profile_enriched,
        })
    }

    fn fetch_references(&self) -> Result<ReferenceDocuments, AssistantError> {
        let resume = self.fetch_reference("resume", &self.references.resume_id)?;
        let prior_letter = self.fetch_reference("cover letter", &self.references.cover_letter_id)?;
        Ok(ReferenceDocuments {
            resume,
            prior_letter,
        })
    }

    fn fetch_reference(&self, label: &str, id: &str) -> Result<String, AssistantError> {
        let reason = match self.documents.download_document(id) {
            Ok(DocumentFetch::Text { text, .. }) if !text.trim().is_empty() => return Ok(text),
            Ok(DocumentFetch::Text { name, .. }) => format!("{label} '{name}' is empty"),
            Ok(DocumentFetch::Unavailable { reason }) => format!("{label}: {reason}"),
            Err(err) => format!("{label}: {err}"),
        };
        Err(AssistantError::MissingReferenceDocuments(reason))
    }

    fn enrich(&self, job_description: &str) -> Enrichment {
        let Some(source) = self.profile.as_deref() else {
            return Enrichment::default();
        };

        println!("\nFetching profile data...");
        let profile = source.profile_data();

        let company_name = match self.writer.extract_company_name(job_description) {
            Ok(name) => name,
            Err(err) => {
                warn!(error = %err, "company name extraction failed; skipping profile data");
                return Enrichment::default();
            }
        };

        let connections = if company_name.is_empty() {
            None
        } else {
            let connections = source.company_connections(&company_name);
            info!(company = %company_name, count = connections.len(), "company connections found");
            Some(connections)
        };

        Enrichment {
            profile: Some(profile),
            connections,
        }
    }
}

fn optional_profile(client: Result<ProfileClient, ConfigError>) -> Option<Box<dyn ProfileSource>> {
    match client {
        Ok(client) => Some(Box::new(client)),
        Err(err) => {
            warn!(error = %err, "profile enrichment disabled");
            None
        }
    }
}

/// Title for a freshly generated letter, e.g. `Cover_Letter_20250301_142233`.
pub fn document_title(now: NaiveDateTime) -> String {
    format!("Cover_Letter_{}", now.format("%Y%m%d_%H%M%S"))
}

pub fn document_link(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{document_id}/edit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;
    use chrono::NaiveDate;

    #[test]
    fn title_uses_compact_timestamp() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|date| date.and_hms_opt(14, 22, 33))
            .expect("valid timestamp");
        assert_eq!(document_title(now), "Cover_Letter_20250301_142233");
    }

    #[test]
    fn link_points_at_editor() {
        assert_eq!(
            document_link("abc123"),
            "https://docs.google.com/document/d/abc123/edit"
        );
    }

    #[test]
    fn missing_profile_credentials_disable_feature() {
        let client = ProfileClient::from_config(&ProfileConfig::default());
        assert!(optional_profile(client).is_none());
    }
}
