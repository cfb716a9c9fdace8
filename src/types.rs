use serde::Deserialize;

// GitHub API response structures
#[derive(Debug, Deserialize)]
pub struct GithubSearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<GithubResponseRepository>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GithubResponseRepository {
    pub id: u64,
    pub full_name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub stargazers_count: u64,
    pub language: Option<String>,
    pub html_url: String,
}
