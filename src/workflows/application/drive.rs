use std::fmt::Debug;
use std::io::Cursor;

use google_drive3::api::{File, Scope};
use google_drive3::{hyper_rustls, hyper_util, yup_oauth2, DriveHub};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::docx;
use crate::config::DriveConfig;

pub const GOOGLE_DOC_MIME: &str = "application/vnd.google-apps.document";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PLAIN_TEXT_MIME: &str = "text/plain";
const LIST_PAGE_SIZE: i32 = 30;
const OAUTH_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/drive.readonly",
    "https://www.googleapis.com/auth/drive.file",
];

pub type DocumentId = String;

/// Result of asking the store for a reference document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFetch {
    Text { name: String, text: String },
    Unavailable { reason: String },
}

impl DocumentFetch {
    pub fn into_text(self) -> Option<String> {
        match self {
            DocumentFetch::Text { text, .. } => Some(text),
            DocumentFetch::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub name: String,
    pub content_type: String,
    pub owner_email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("drive authentication failed: {0}")]
    Auth(String),
    #[error("document unavailable: {0}")]
    Unavailable(String),
    #[error("drive upload failed: {0}")]
    Upload(String),
    #[error("drive operation failed: {0}")]
    Backend(String),
    #[error("drive runtime unavailable: {0}")]
    Runtime(String),
}

pub trait DocumentStore: Debug {
    fn download_document(&self, id: &str) -> Result<DocumentFetch, DriveError>;
    fn save_document(&self, content: &str, title: &str) -> Result<DocumentId, DriveError>;
    fn list_documents(&self) -> Result<Vec<DocumentSummary>, DriveError>;
    fn document_metadata(&self, id: &str) -> Result<DocumentSummary, DriveError>;
}

type DriveConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;

/// Synchronous facade over the generated google-drive3 client. Every call is
/// driven to completion on an owned current-thread runtime.
pub struct GoogleDriveClient {
    hub: DriveHub<DriveConnector>,
    runtime: Runtime,
}

impl GoogleDriveClient {
    /// Builds an installed-app OAuth session. Tokens are persisted to the
    /// configured cache file and refreshed by the authenticator when expired.
    pub fn authenticate(config: &DriveConfig) -> Result<Self, DriveError> {
        let has_cached_token = config.token_cache.exists();
        let (client_id, client_secret) = match (&config.client_id, &config.client_secret) {
            (Some(id), Some(secret)) => (id.clone(), secret.clone()),
            _ if has_cached_token => (String::new(), String::new()),
            _ => {
                return Err(DriveError::Auth(
                    "no cached token and no GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET to obtain one"
                        .to_string(),
                ))
            }
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| DriveError::Runtime(err.to_string()))?;

        let secret = yup_oauth2::ApplicationSecret {
            client_id,
            client_secret,
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            auth_provider_x509_cert_url: Some(
                "https://www.googleapis.com/oauth2/v1/certs".to_string(),
            ),
            redirect_uris: vec!["http://localhost".to_string()],
            ..Default::default()
        };
        let token_cache = config.token_cache.clone();

        let hub = runtime.block_on(async move {
            let auth = yup_oauth2::InstalledFlowAuthenticator::builder(
                secret,
                yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
            )
            .persist_tokens_to_disk(token_cache)
            .build()
            .await
            .map_err(|err| DriveError::Auth(err.to_string()))?;

            auth.token(&OAUTH_SCOPES)
                .await
                .map_err(|err| DriveError::Auth(err.to_string()))?;

            let connector = hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .map_err(|err| DriveError::Runtime(err.to_string()))?
                .https_or_http()
                .enable_http1()
                .build();
            let client =
                hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
                    .build(connector);

            Ok::<_, DriveError>(DriveHub::new(client, auth))
        })?;

        info!(token_cache = %config.token_cache.display(), "google drive session ready");
        Ok(Self { hub, runtime })
    }

    fn map_error<E: std::fmt::Display>(err: E) -> DriveError {
        DriveError::Backend(err.to_string())
    }

    fn fetch_metadata(&self, id: &str) -> Result<File, DriveError> {
        let result = self.runtime.block_on(async {
            self.hub
                .files()
                .get(id)
                .param("fields", "id,name,mimeType,owners")
                .supports_all_drives(true)
                .add_scope(Scope::Readonly)
                .doit()
                .await
        });

        let (_, file) = result.map_err(GoogleDriveClient::map_error)?;
        Ok(file)
    }

    fn fetch_bytes(&self, id: &str, export_as: Option<&str>) -> Result<Vec<u8>, DriveError> {
        let body = self.runtime.block_on(async {
            let response = match export_as {
                Some(mime_type) => self
                    .hub
                    .files()
                    .export(id, mime_type)
                    .add_scope(Scope::Readonly)
                    .doit()
                    .await
                    .map_err(GoogleDriveClient::map_error)?,
                None => {
                    self.hub
                        .files()
                        .get(id)
                        .param("alt", "media")
                        .supports_all_drives(true)
                        .add_scope(Scope::Readonly)
                        .doit()
                        .await
                        .map_err(GoogleDriveClient::map_error)?
                        .0
                }
            };

            google_drive3::common::to_bytes(response.into_body())
                .await
                .ok_or_else(|| DriveError::Backend("empty response body".to_string()))
        })?;

        Ok(body.to_vec())
    }
}

impl Debug for GoogleDriveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleDriveClient").finish_non_exhaustive()
    }
}

impl DocumentStore for GoogleDriveClient {
    fn download_document(&self, id: &str) -> Result<DocumentFetch, DriveError> {
        let file = match self.fetch_metadata(id) {
            Ok(file) => file,
            Err(err) => {
                return Ok(DocumentFetch::Unavailable {
                    reason: err.to_string(),
                })
            }
        };

        let name = file.name.unwrap_or_else(|| id.to_string());
        let mime_type = file.mime_type.unwrap_or_default();
        println!("Found file: {name} ({mime_type})");

        let fetched = match mime_type.as_str() {
            GOOGLE_DOC_MIME => self.fetch_bytes(id, Some(PLAIN_TEXT_MIME)),
            DOCX_MIME | PLAIN_TEXT_MIME => self.fetch_bytes(id, None),
            other => {
                println!("Unsupported file type: {other}");
                return Ok(DocumentFetch::Unavailable {
                    reason: format!("Unsupported file type: {other}"),
                });
            }
        };

        let bytes = match fetched {
            Ok(bytes) => bytes,
            Err(err) => {
                return Ok(DocumentFetch::Unavailable {
                    reason: err.to_string(),
                })
            }
        };
        debug!(document = %id, bytes = bytes.len(), "download 100%");

        let text = if mime_type == DOCX_MIME {
            match docx::paragraph_text(&bytes) {
                Ok(text) => text,
                Err(err) => {
                    return Ok(DocumentFetch::Unavailable {
                        reason: err.to_string(),
                    })
                }
            }
        } else {
            String::from_utf8_lossy(&bytes).into_owned()
        };

        Ok(DocumentFetch::Text { name, text })
    }

    fn save_document(&self, content: &str, title: &str) -> Result<DocumentId, DriveError> {
        let metadata = File {
            name: Some(title.to_string()),
            mime_type: Some(GOOGLE_DOC_MIME.to_string()),
            ..File::default()
        };

        let cursor = Cursor::new(content.as_bytes().to_vec());

        let result = self.runtime.block_on(async {
            self.hub
                .files()
                .create(metadata)
                .param("fields", "id")
                .supports_all_drives(true)
                .add_scope(Scope::File)
                .upload(cursor, mime::TEXT_PLAIN_UTF_8)
                .await
        });

        let (_, file) = result.map_err(|err| DriveError::Upload(err.to_string()))?;
        file.id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DriveError::Upload("drive did not return a document id".to_string()))
    }

    fn list_documents(&self) -> Result<Vec<DocumentSummary>, DriveError> {
        let result = self.runtime.block_on(async {
            self.hub
                .files()
                .list()
                .q(&format!("mimeType='{GOOGLE_DOC_MIME}'"))
                .param("fields", "nextPageToken, files(id,name,mimeType,owners)")
                .page_size(LIST_PAGE_SIZE)
                .add_scope(Scope::Readonly)
                .doit()
                .await
        });

        let (_, file_list) = result.map_err(GoogleDriveClient::map_error)?;
        Ok(file_list
            .files
            .unwrap_or_default()
            .into_iter()
            .map(summarize)
            .collect())
    }

    fn document_metadata(&self, id: &str) -> Result<DocumentSummary, DriveError> {
        self.fetch_metadata(id)
            .map(summarize)
            .map_err(|err| DriveError::Unavailable(err.to_string()))
    }
}

fn summarize(file: File) -> DocumentSummary {
    DocumentSummary {
        id: file.id.unwrap_or_default(),
        name: file.name.unwrap_or_else(|| "untitled".to_string()),
        content_type: file.mime_type.unwrap_or_default(),
        owner_email: file
            .owners
            .and_then(|owners| owners.into_iter().next())
            .and_then(|owner| owner.email_address),
    }
}
