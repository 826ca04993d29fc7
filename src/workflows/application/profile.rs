use std::fmt::Debug;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{ConfigError, ProfileConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSignal {
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub text: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyConnection {
    pub name: String,
    pub title: String,
}

/// Capability the assistant consults for optional profile enrichment.
/// Implementations never fail: they degrade to placeholder data instead.
pub trait ProfileSource: Debug {
    fn profile_data(&self) -> ProfileSignal;
    fn company_connections(&self, company_name: &str) -> Vec<CompanyConnection>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("profile service rejected login (status {0})")]
    Login(u16),
}

/// Profile data provider. The variant is chosen once at construction and
/// stays fixed for the rest of the run.
#[derive(Debug)]
pub enum ProfileClient {
    Live(LiveProfileApi),
    Placeholder,
}

impl ProfileClient {
    pub fn from_config(config: &ProfileConfig) -> Result<Self, ConfigError> {
        let (username, password) = match (&config.username, &config.password) {
            (Some(username), Some(password))
                if !username.trim().is_empty() && !password.trim().is_empty() =>
            {
                (username, password)
            }
            _ => return Err(ConfigError::MissingProfileCredentials),
        };

        if !config.live {
            info!("profile enrichment using placeholder data");
            return Ok(ProfileClient::Placeholder);
        }

        let Some(api_base) = config.api_base.as_deref() else {
            warn!("LINKEDIN_LIVE is set without LINKEDIN_API_BASE; using placeholder data");
            return Ok(ProfileClient::Placeholder);
        };

        match LiveProfileApi::login(api_base, username, password) {
            Ok(api) => {
                info!("profile enrichment using live profile data");
                Ok(ProfileClient::Live(api))
            }
            Err(err) => {
                warn!(error = %err, "profile login failed; using placeholder data");
                Ok(ProfileClient::Placeholder)
            }
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, ProfileClient::Live(_))
    }
}

impl ProfileSource for ProfileClient {
    fn profile_data(&self) -> ProfileSignal {
        match self {
            ProfileClient::Placeholder => placeholder_profile(),
            ProfileClient::Live(api) => api.profile().unwrap_or_else(|err| {
                warn!(error = %err, "error fetching profile data; using placeholder");
                placeholder_profile()
            }),
        }
    }

    fn company_connections(&self, company_name: &str) -> Vec<CompanyConnection> {
        match self {
            ProfileClient::Placeholder => placeholder_connections(company_name),
            ProfileClient::Live(api) => api.connections_at(company_name).unwrap_or_else(|err| {
                warn!(error = %err, company = company_name, "connection search failed; using placeholder");
                placeholder_connections(company_name)
            }),
        }
    }
}

pub fn placeholder_profile() -> ProfileSignal {
    ProfileSignal {
        summary: "Experienced software engineer passionate about building innovative solutions."
            .to_string(),
        experience: vec![
            ExperienceEntry {
                title: "Senior Software Engineer".to_string(),
                company: "Tech Corp".to_string(),
                duration: "3 years".to_string(),
                description: "Led development of cloud-based applications.".to_string(),
            },
            ExperienceEntry {
                title: "Software Developer".to_string(),
                company: "StartUp Inc".to_string(),
                duration: "2 years".to_string(),
                description: "Full-stack development of web applications.".to_string(),
            },
        ],
        skills: ["Python", "JavaScript", "React", "Cloud Computing", "System Design"]
            .into_iter()
            .map(String::from)
            .collect(),
        recommendations: placeholder_recommendations(),
    }
}

fn placeholder_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation {
            text: "An exceptional engineer who consistently delivers high-quality work."
                .to_string(),
            author: "Jane Smith".to_string(),
        },
        Recommendation {
            text: "Great team player with strong problem-solving skills.".to_string(),
            author: "John Doe".to_string(),
        },
    ]
}

pub fn placeholder_connections(company_name: &str) -> Vec<CompanyConnection> {
    vec![
        CompanyConnection {
            name: "Alice Johnson".to_string(),
            title: format!("Product Manager at {company_name}"),
        },
        CompanyConnection {
            name: "Bob Wilson".to_string(),
            title: format!("Software Engineer at {company_name}"),
        },
    ]
}

/// Authenticated session against a profile HTTP API.
#[derive(Debug)]
pub struct LiveProfileApi {
    http: Client,
    base_url: String,
    session_token: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProfileRecord {
    summary: String,
    first_name: String,
    last_name: String,
    headline: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExperienceRecord {
    title: String,
    company_name: String,
    time_period: TimePeriod,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TimePeriod {
    duration: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SkillRecord {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RecommendationRecord {
    recommendation_text: String,
    recommender: PersonName,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PersonName {
    first_name: String,
    last_name: String,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    public_id: String,
}

impl LiveProfileApi {
    fn login(base_url: &str, username: &str, password: &str) -> Result<Self, ProfileError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let response = http
            .post(format!("{base_url}/auth/login"))
            .json(&LoginRequest { username, password })
            .send()?;
        if !response.status().is_success() {
            return Err(ProfileError::Login(response.status().as_u16()));
        }
        let LoginResponse { token } = response.json()?;

        Ok(Self {
            http,
            base_url,
            session_token: token,
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ProfileError> {
        let value = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.session_token)
            .query(query)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(value)
    }

    fn profile(&self) -> Result<ProfileSignal, ProfileError> {
        let profile: ProfileRecord = self.get("/profiles/me", &[])?;
        let experience: Vec<ExperienceRecord> = self.get("/profiles/me/experience", &[])?;
        let skills: Vec<SkillRecord> = self.get("/profiles/me/skills", &[])?;

        Ok(ProfileSignal {
            summary: profile.summary,
            experience: experience
                .into_iter()
                .map(|exp| ExperienceEntry {
                    title: exp.title,
                    company: exp.company_name,
                    duration: exp.time_period.duration,
                    description: exp.description,
                })
                .collect(),
            skills: skills.into_iter().map(|skill| skill.name).collect(),
            recommendations: self.recommendations(),
        })
    }

    fn recommendations(&self) -> Vec<Recommendation> {
        let records: Vec<RecommendationRecord> =
            match self.get("/profiles/me/recommendations", &[]) {
                Ok(records) => records,
                Err(err) => {
                    warn!(error = %err, "error fetching recommendations");
                    return Vec::new();
                }
            };

        records
            .into_iter()
            .map(|rec| Recommendation {
                text: rec.recommendation_text,
                author: full_name(&rec.recommender.first_name, &rec.recommender.last_name),
            })
            .collect()
    }

    fn connections_at(&self, company_name: &str) -> Result<Vec<CompanyConnection>, ProfileError> {
        let results: Vec<SearchResult> = self.get(
            "/search/people",
            &[
                ("keywords", company_name),
                ("connection_of", "me"),
                ("current_company", "true"),
            ],
        )?;

        results
            .into_iter()
            .map(|result| {
                let profile: ProfileRecord =
                    self.get(&format!("/profiles/{}", result.public_id), &[])?;
                Ok(CompanyConnection {
                    name: full_name(&profile.first_name, &profile.last_name),
                    title: profile.headline,
                })
            })
            .collect()
    }
}

fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}
