use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages shown in the nav bar when the config doesn't override them.
pub const DEFAULT_LANGUAGES: [&str; 6] = ["All", "JavaScript", "Ruby", "Java", "PHP", "Python"];

/// The key meaning "no language filter".
pub const ALL_LANGUAGES: &str = "All";

/// A language filter value. Any string is accepted; unknown languages just
/// come back empty from the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_all(&self) -> bool {
        self.0 == ALL_LANGUAGES
    }
}

impl Default for CategoryKey {
    fn default() -> Self {
        Self::new(ALL_LANGUAGES)
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    pub avatar_url: String,
}

impl Owner {
    pub fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.login)
    }
}

/// One repository as returned by the search API. `url` identifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub name: String,
    pub owner: Owner,
    pub url: String,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
}

/// Format a count with comma thousands separators: 1234567 -> "1,234,567".
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_count_small_numbers_unchanged() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn format_count_inserts_separators() {
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(12_345), "12,345");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn default_key_is_all() {
        assert!(CategoryKey::default().is_all());
        assert!(!CategoryKey::from("Ruby").is_all());
    }

    #[test]
    fn key_serializes_as_plain_string() {
        let json = serde_json::to_string(&CategoryKey::from("Rust")).unwrap();
        assert_eq!(json, "\"Rust\"");
    }

    #[test]
    fn owner_profile_url() {
        let owner = Owner {
            login: "rust-lang".to_string(),
            avatar_url: String::new(),
        };
        assert_eq!(owner.profile_url(), "https://github.com/rust-lang");
    }
}
