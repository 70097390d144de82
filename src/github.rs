use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::GitHubConfig;
use crate::error::{PopularError, Result};
use crate::source::RepoSource;
use crate::types::{CategoryKey, Owner, RepositoryRecord};

const USER_AGENT: &str = concat!("popular/", env!("CARGO_PKG_VERSION"));

pub struct GitHub {
    client: Client,
    api_url: String,
    per_page: Option<u32>,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl GitHub {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            per_page: config.per_page,
        })
    }

    fn search_url(&self, key: &CategoryKey) -> String {
        let mut url = format!(
            "{}/search/repositories?q={}&sort=stars&order=desc&type=Repositories",
            self.api_url,
            urlencoding::encode(&search_query(key))
        );
        if let Some(per_page) = self.per_page {
            url.push_str(&format!("&per_page={}", per_page));
        }
        url
    }
}

/// Search qualifier for a language. "All" drops the language filter.
fn search_query(key: &CategoryKey) -> String {
    if key.is_all() {
        "stars:>1".to_string()
    } else {
        format!("stars:>1 language:{}", key.as_str())
    }
}

// GitHub search API response types

#[derive(Deserialize)]
struct GhSearchResponse {
    items: Option<Vec<GhRepo>>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct GhRepo {
    name: String,
    owner: GhOwner,
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks: u64,
    #[serde(default)]
    open_issues: u64,
}

#[derive(Deserialize)]
struct GhOwner {
    login: String,
    #[serde(default)]
    avatar_url: String,
}

impl From<GhRepo> for RepositoryRecord {
    fn from(repo: GhRepo) -> Self {
        RepositoryRecord {
            name: repo.name,
            owner: Owner {
                login: repo.owner.login,
                avatar_url: repo.owner.avatar_url,
            },
            url: repo.html_url,
            stars: repo.stargazers_count,
            forks: repo.forks,
            open_issues: repo.open_issues,
        }
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

/// A body without `items` is a failure; its `message` is what the user sees.
fn parse_search_response(status: StatusCode, body: &str) -> Result<Vec<RepositoryRecord>> {
    let parsed: GhSearchResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) if status.is_success() => return Err(PopularError::Api(e.to_string())),
        Err(_) => return Err(PopularError::Api(status_text(status))),
    };

    match parsed.items {
        Some(items) => Ok(items.into_iter().map(RepositoryRecord::from).collect()),
        None => Err(PopularError::Api(
            parsed.message.unwrap_or_else(|| status_text(status)),
        )),
    }
}

#[async_trait]
impl RepoSource for GitHub {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn fetch_popular(&self, key: &CategoryKey) -> Result<Vec<RepositoryRecord>> {
        let url = self.search_url(key);
        tracing::debug!(%url, "searching repositories");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        parse_search_response(status, &body)
    }
}
