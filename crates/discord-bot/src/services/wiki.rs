use eyre::Result;
use medley_core::text::wiki_slug;
use reqwest::StatusCode;
use tracing::debug;

pub struct WikiClient {
    http: reqwest::Client,
    base_url: String,
}

impl WikiClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn page_url(&self, query: &str) -> String {
        format!("{}/{}", self.base_url, wiki_slug(query))
    }

    /// URL of the page titled `query`, if the wiki has one.
    pub async fn find_page(&self, query: &str) -> Result<Option<String>> {
        let url = self.page_url(query);
        let status = self.http.get(&url).send().await?.status();
        debug!(%url, %status, "Wiki lookup");

        Ok((status == StatusCode::OK).then_some(url))
    }
}
