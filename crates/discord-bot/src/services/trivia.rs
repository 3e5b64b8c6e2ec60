use eyre::{Result, WrapErr};
use medley_core::{
    errors::MedleyError,
    models::trivia::{
        Difficulty, TriviaCategoriesResponse, TriviaCategory, TriviaQuestion, TriviaResponse,
        check_response_code,
    },
};
use tokio::sync::RwLock;

pub struct TriviaClient {
    http: reqwest::Client,
    base_url: String,
    categories: RwLock<Option<Vec<TriviaCategory>>>,
}

impl TriviaClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            categories: RwLock::new(None),
        }
    }

    /// Category list, fetched once and then served from memory.
    pub async fn categories(&self) -> Result<Vec<TriviaCategory>> {
        if let Some(categories) = self.categories.read().await.as_ref() {
            return Ok(categories.clone());
        }

        let response = self
            .http
            .get(format!("{}/api_category.php", self.base_url))
            .send()
            .await?
            .error_for_status()
            .wrap_err("Trivia category request failed")?
            .json::<TriviaCategoriesResponse>()
            .await
            .wrap_err("Failed to decode trivia categories")?;

        let mut categories = response.trivia_categories;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        *self.categories.write().await = Some(categories.clone());

        Ok(categories)
    }

    /// Fetch one multiple-choice question.
    pub async fn question(
        &self,
        category: Option<u32>,
        difficulty: Option<Difficulty>,
    ) -> Result<TriviaQuestion> {
        let mut query = vec![
            ("amount", "1".to_string()),
            ("type", "multiple".to_string()),
            ("encode", "url3986".to_string()),
        ];
        if let Some(category) = category {
            query.push(("category", category.to_string()));
        }
        if let Some(difficulty) = difficulty {
            query.push(("difficulty", difficulty.as_str().to_string()));
        }

        let response = self
            .http
            .get(format!("{}/api.php", self.base_url))
            .query(&query)
            .send()
            .await?
            .error_for_status()
            .wrap_err("Trivia request failed")?
            .json::<TriviaResponse>()
            .await
            .wrap_err("Failed to decode trivia question")?;

        check_response_code(response.response_code)?;

        let raw = response.results.into_iter().next().ok_or_else(|| {
            MedleyError::NotFound("The trivia service returned no question.".to_string())
        })?;

        let question = TriviaQuestion::from_raw(raw, &mut rand::thread_rng())?;
        Ok(question)
    }
}
