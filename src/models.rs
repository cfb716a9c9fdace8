use serde::{Deserialize, Deserializer, Serialize};

use crate::types::GithubResponseRepository;

/// A bookmarked repository, as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "stargazersCount")]
    pub stargazers_count: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub language: String,
    pub url: String,
}

/// Body of `GET /repo/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryList {
    #[serde(default)]
    pub repos: Vec<Repository>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<&GithubResponseRepository> for Repository {
    fn from(item: &GithubResponseRepository) -> Self {
        Self {
            id: item.id.to_string(),
            full_name: item.full_name.clone(),
            created_at: item.created_at.clone(),
            stargazers_count: item.stargazers_count,
            language: item.language.clone().unwrap_or_default(),
            url: item.html_url.clone(),
        }
    }
}

impl From<GithubResponseRepository> for Repository {
    fn from(item: GithubResponseRepository) -> Self {
        Self::from(&item)
    }
}

/// Ordering applied to the bookmark list by stargazer count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}
