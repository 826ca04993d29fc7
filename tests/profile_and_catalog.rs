use std::sync::Mutex;

use job_assistant::config::{DocumentConfig, ProfileConfig};
use job_assistant::workflows::application::{
    format_profile_block, render_listing, render_reference_checks, CompletionBackend,
    CoverLetterWriter, DocumentCatalog, DocumentFetch, DocumentId, DocumentStore, DocumentSummary,
    DriveError, GenerationError, ProfileClient, ProfileSource, ReferenceCheck,
};

#[derive(Debug)]
struct EchoCompanyBackend {
    company: String,
}

impl CompletionBackend for EchoCompanyBackend {
    fn complete(&self, _system: &str, _prompt: &str) -> Result<String, GenerationError> {
        Ok(format!("\n{}\n", self.company))
    }
}

#[derive(Debug)]
struct ListingStore {
    entries: Vec<DocumentSummary>,
    fail_listing: bool,
    lookups: Mutex<Vec<String>>,
}

impl ListingStore {
    fn new(entries: Vec<DocumentSummary>) -> Self {
        Self {
            entries,
            fail_listing: false,
            lookups: Mutex::new(Vec::new()),
        }
    }
}

impl DocumentStore for ListingStore {
    fn download_document(&self, id: &str) -> Result<DocumentFetch, DriveError> {
        Ok(DocumentFetch::Unavailable {
            reason: format!("{id} is not downloadable here"),
        })
    }

    fn save_document(&self, _content: &str, _title: &str) -> Result<DocumentId, DriveError> {
        Err(DriveError::Upload("read-only store".to_string()))
    }

    fn list_documents(&self) -> Result<Vec<DocumentSummary>, DriveError> {
        if self.fail_listing {
            return Err(DriveError::Backend("403 insufficient scope".to_string()));
        }
        Ok(self.entries.clone())
    }

    fn document_metadata(&self, id: &str) -> Result<DocumentSummary, DriveError> {
        self.lookups.lock().expect("lookups mutex").push(id.to_string());
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .ok_or_else(|| DriveError::Unavailable(format!("{id} not found")))
    }
}

fn placeholder_client() -> ProfileClient {
    ProfileClient::from_config(&ProfileConfig {
        username: Some("jane@example.com".to_string()),
        password: Some("secret".to_string()),
        live: false,
        api_base: None,
    })
    .expect("credentials present")
}

fn resume_summary() -> DocumentSummary {
    DocumentSummary {
        id: "resume-1".to_string(),
        name: "Jane Doe Resume".to_string(),
        content_type: "application/vnd.google-apps.document".to_string(),
        owner_email: Some("jane@example.com".to_string()),
    }
}

#[test]
fn extracted_company_flows_into_placeholder_connection_titles() {
    let client = placeholder_client();

    for company in ["Acme Corp", "Globex", "Initech Holdings, LLC"] {
        let writer = CoverLetterWriter::new(Box::new(EchoCompanyBackend {
            company: company.to_string(),
        }));
        let extracted = writer
            .extract_company_name(&format!("Senior Engineer at {company}. Apply today."))
            .expect("extraction succeeds");
        assert_eq!(extracted, company);

        let connections = client.company_connections(&extracted);
        assert!(!connections.is_empty());
        for connection in &connections {
            assert!(
                connection.title.contains(company),
                "{} should mention {company}",
                connection.title
            );
        }
    }
}

#[test]
fn placeholder_profile_renders_into_prompt_block() {
    let client = placeholder_client();
    let profile = client.profile_data();
    let connections = client.company_connections("Acme Corp");

    let block = format_profile_block(Some(&profile), Some(connections.as_slice()));
    assert!(block.contains("LinkedIn Profile Data"));
    assert!(block.contains("Software Developer at StartUp Inc (2 years)"));
    assert!(block.contains("System Design"));
    assert!(block.contains("\"An exceptional engineer who consistently delivers high-quality work.\" - Jane Smith"));
    assert!(block.contains("professional connections at the company"));

    assert!(format_profile_block(None, Some(connections.as_slice())).is_empty());
}

#[test]
fn empty_store_lists_nothing_and_says_so() {
    let store = ListingStore::new(Vec::new());
    let catalog = DocumentCatalog::new(&store);

    let entries = catalog.list();
    assert!(entries.is_empty());
    assert!(render_listing(&entries).contains("No files found."));
}

#[test]
fn listing_failure_yields_empty_listing() {
    let store = ListingStore {
        fail_listing: true,
        ..ListingStore::new(vec![resume_summary()])
    };

    assert!(DocumentCatalog::new(&store).list().is_empty());
}

#[test]
fn reference_check_skips_unconfigured_ids() {
    let store = ListingStore::new(vec![resume_summary()]);
    let catalog = DocumentCatalog::new(&store);

    let checks = catalog.check_references(&DocumentConfig {
        resume_id: Some("resume-1".to_string()),
        cover_letter_id: None,
    });

    assert_eq!(checks.len(), 1);
    assert!(matches!(
        &checks[0],
        ReferenceCheck::Found { label: "Resume", summary } if summary.name == "Jane Doe Resume"
    ));
    assert_eq!(
        *store.lookups.lock().expect("lookups mutex"),
        vec!["resume-1".to_string()]
    );
}

#[test]
fn reference_check_reports_inaccessible_letter() {
    let store = ListingStore::new(vec![resume_summary()]);
    let checks = DocumentCatalog::new(&store).check_references(&DocumentConfig {
        resume_id: Some("resume-1".to_string()),
        cover_letter_id: Some("letter-404".to_string()),
    });

    let rendered = render_reference_checks(&checks);
    assert!(rendered.contains("Resume found: Jane Doe Resume (resume-1)"));
    assert!(rendered.contains("Could not access cover letter: document unavailable: letter-404 not found"));
}
