use std::{fmt, str::FromStr};

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::errors::{MedleyError, MedleyResult};

/// Body of `api.php` on the trivia service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriviaResponse {
    pub response_code: u8,
    #[serde(default)]
    pub results: Vec<RawTriviaQuestion>,
}

/// A question as delivered by the trivia service, still url3986-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTriviaQuestion {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaCategory {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriviaCategoriesResponse {
    pub trivia_categories: Vec<TriviaCategory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = MedleyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(MedleyError::Validation(format!("Unknown difficulty: {}", other))),
        }
    }
}

/// Map a non-zero trivia response code to an error.
pub fn check_response_code(code: u8) -> MedleyResult<()> {
    match code {
        0 => Ok(()),
        1 => Err(MedleyError::NotFound(
            "No trivia questions available for that category and difficulty.".to_string(),
        )),
        5 => Err(MedleyError::Upstream(eyre::eyre!(
            "Trivia service rate limit reached"
        ))),
        other => Err(MedleyError::Upstream(eyre::eyre!(
            "Trivia service returned response code {}",
            other
        ))),
    }
}

/// A decoded question ready to be shown, with its options already shuffled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaQuestion {
    pub category: String,
    pub difficulty: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl TriviaQuestion {
    pub fn from_raw<R: Rng + ?Sized>(raw: RawTriviaQuestion, rng: &mut R) -> MedleyResult<Self> {
        let correct = decode(&raw.correct_answer)?;

        let mut options = raw
            .incorrect_answers
            .iter()
            .map(|answer| decode(answer))
            .collect::<MedleyResult<Vec<_>>>()?;
        options.push(correct.clone());
        options.shuffle(rng);

        let correct_index = options
            .iter()
            .position(|option| *option == correct)
            .ok_or_else(|| MedleyError::Validation("Correct answer missing from options".to_string()))?;

        Ok(Self {
            category: decode(&raw.category)?,
            difficulty: decode(&raw.difficulty)?,
            question: decode(&raw.question)?,
            options,
            correct_index,
        })
    }

    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct_index]
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    /// Question text followed by the numbered options.
    pub fn prompt(&self) -> String {
        let mut prompt = format!("**{}**\n\n", self.question);
        for (idx, option) in self.options.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", idx + 1, option));
        }
        prompt
    }
}

fn decode(value: &str) -> MedleyResult<String> {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| MedleyError::Validation(format!("Malformed trivia text: {}", e)))
}
