use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_TOKEN_CACHE: &str = "token.json";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Top-level configuration for the assistant, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub drive: DriveConfig,
    pub documents: DocumentConfig,
    pub profile: ProfileConfig,
    pub generation: GenerationConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let drive = DriveConfig {
            client_id: optional_var("GOOGLE_CLIENT_ID"),
            client_secret: optional_var("GOOGLE_CLIENT_SECRET"),
            token_cache: optional_var("GOOGLE_TOKEN_CACHE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_CACHE)),
        };

        let documents = DocumentConfig {
            resume_id: optional_var("RESUME_FILE_ID"),
            cover_letter_id: optional_var("COVER_LETTER_FILE_ID"),
        };

        let profile = ProfileConfig {
            username: optional_var("LINKEDIN_USERNAME"),
            password: optional_var("LINKEDIN_PASSWORD"),
            live: parse_flag("LINKEDIN_LIVE")?,
            api_base: optional_var("LINKEDIN_API_BASE"),
        };

        let generation = GenerationConfig {
            api_key: optional_var("OPENAI_API_KEY"),
            model: optional_var("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            api_base: optional_var("OPENAI_API_BASE")
                .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            drive,
            documents,
            profile,
            generation,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// OAuth client and token cache settings for Google Drive.
#[derive(Debug, Clone)]
pub struct DriveConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_cache: PathBuf,
}

/// Identifiers of the reference documents stored in Drive.
#[derive(Debug, Clone, Default)]
pub struct DocumentConfig {
    pub resume_id: Option<String>,
    pub cover_letter_id: Option<String>,
}

impl DocumentConfig {
    pub fn reference_ids(&self) -> Result<ReferenceDocumentIds, ConfigError> {
        match (&self.resume_id, &self.cover_letter_id) {
            (Some(resume_id), Some(cover_letter_id)) => Ok(ReferenceDocumentIds {
                resume_id: resume_id.clone(),
                cover_letter_id: cover_letter_id.clone(),
            }),
            _ => Err(ConfigError::MissingReferenceIds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDocumentIds {
    pub resume_id: String,
    pub cover_letter_id: String,
}

/// Profile service credentials. Both secrets are optional at load time; the
/// profile client decides whether the feature can be enabled.
#[derive(Debug, Clone, Default)]
pub struct ProfileConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub live: bool,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingReferenceIds,
    MissingProfileCredentials,
    MissingGenerationKey,
    InvalidFlag { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingReferenceIds => {
                write!(f, "RESUME_FILE_ID and COVER_LETTER_FILE_ID must both be set")
            }
            ConfigError::MissingProfileCredentials => write!(
                f,
                "LinkedIn credentials not found (LINKEDIN_USERNAME / LINKEDIN_PASSWORD)"
            ),
            ConfigError::MissingGenerationKey => write!(f, "OPENAI_API_KEY must be set"),
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{key} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(key: &'static str) -> Result<bool, ConfigError> {
    match optional_var(key) {
        None => Ok(false),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { key, value: raw }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "GOOGLE_CLIENT_ID",
            "GOOGLE_CLIENT_SECRET",
            "GOOGLE_TOKEN_CACHE",
            "RESUME_FILE_ID",
            "COVER_LETTER_FILE_ID",
            "LINKEDIN_USERNAME",
            "LINKEDIN_PASSWORD",
            "LINKEDIN_LIVE",
            "LINKEDIN_API_BASE",
            "OPENAI_API_KEY",
            "OPENAI_MODEL",
            "OPENAI_API_BASE",
            "APP_LOG_LEVEL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.drive.token_cache, PathBuf::from("token.json"));
        assert!(config.drive.client_id.is_none());
        assert_eq!(config.generation.model, "gpt-4");
        assert_eq!(config.generation.api_base, "https://api.openai.com/v1");
        assert!(!config.profile.live);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn blank_values_count_as_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LINKEDIN_USERNAME", "   ");
        env::set_var("RESUME_FILE_ID", "resume-1");
        let config = AppConfig::load().expect("config loads");
        assert!(config.profile.username.is_none());
        assert_eq!(
            config.documents.reference_ids(),
            Err(ConfigError::MissingReferenceIds)
        );
    }

    #[test]
    fn live_flag_rejects_garbage() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LINKEDIN_LIVE", "maybe");
        let err = AppConfig::load().expect_err("flag is invalid");
        assert!(matches!(err, ConfigError::InvalidFlag { key: "LINKEDIN_LIVE", .. }));

        env::set_var("LINKEDIN_LIVE", "TRUE");
        let config = AppConfig::load().expect("flag parses");
        assert!(config.profile.live);
        reset_env();
    }

    #[test]
    fn reference_ids_require_both_documents() {
        let documents = DocumentConfig {
            resume_id: Some("resume-1".to_string()),
            cover_letter_id: Some("letter-1".to_string()),
        };
        let ids = documents.reference_ids().expect("both ids present");
        assert_eq!(ids.resume_id, "resume-1");
        assert_eq!(ids.cover_letter_id, "letter-1");
    }
}
