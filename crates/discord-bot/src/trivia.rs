//! In-flight trivia wizards and questions.
//!
//! Entries are keyed by the id of the message carrying the components.
//! Resolving an entry (starting, answering or timing out) removes it, so
//! whichever path gets there first wins and the others see it as expired.

use std::{collections::HashMap, sync::Arc, time::Duration};

use medley_core::models::trivia::{Difficulty, TriviaCategory, TriviaQuestion};
use tokio::sync::RwLock;

pub const SETUP_TIMEOUT: Duration = Duration::from_secs(60);
pub const QUESTION_TIMEOUT: Duration = Duration::from_secs(30);

pub const CATEGORY_SELECT_ID: &str = "trivia_category";
pub const DIFFICULTY_SELECT_ID: &str = "trivia_difficulty";
pub const START_BUTTON_ID: &str = "trivia_start";
pub const ANSWER_PREFIX: &str = "trivia_answer_";

/// Select menu value meaning "no preference".
pub const ANY_VALUE: &str = "any";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaSetup {
    pub user_id: u64,
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub categories: Vec<TriviaCategory>,
}

impl TriviaSetup {
    pub fn new(user_id: u64, categories: Vec<TriviaCategory>) -> Self {
        Self {
            user_id,
            category: None,
            difficulty: None,
            categories,
        }
    }

    pub fn category_name(&self) -> &str {
        self.category
            .and_then(|id| self.categories.iter().find(|category| category.id == id))
            .map(|category| category.name.as_str())
            .unwrap_or("Any category")
    }

    pub fn difficulty_label(&self) -> &str {
        self.difficulty
            .map(|difficulty| difficulty.label())
            .unwrap_or("Any difficulty")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveQuestion {
    pub user_id: u64,
    pub question: TriviaQuestion,
}

/// Result of a user touching a trivia component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<T> {
    /// Nothing is registered for the message any more.
    Expired,
    /// Someone other than the invoking user clicked.
    NotYours,
    Granted(T),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Wrong { correct: String },
}

#[derive(Clone, Default)]
pub struct TriviaState {
    setups: Arc<RwLock<HashMap<u64, TriviaSetup>>>,
    questions: Arc<RwLock<HashMap<u64, ActiveQuestion>>>,
}

impl TriviaState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open_setup(&self, message_id: u64, setup: TriviaSetup) {
        self.setups.write().await.insert(message_id, setup);
    }

    /// Apply `update` to the wizard if `user_id` owns it.
    pub async fn update_setup<F>(&self, message_id: u64, user_id: u64, update: F) -> Access<TriviaSetup>
    where
        F: FnOnce(&mut TriviaSetup),
    {
        let mut setups = self.setups.write().await;
        match setups.get_mut(&message_id) {
            None => Access::Expired,
            Some(setup) if setup.user_id != user_id => Access::NotYours,
            Some(setup) => {
                update(setup);
                Access::Granted(setup.clone())
            }
        }
    }

    /// Remove the wizard so its question can be started.
    pub async fn take_setup(&self, message_id: u64, user_id: u64) -> Access<TriviaSetup> {
        let mut setups = self.setups.write().await;
        match setups.get(&message_id) {
            None => Access::Expired,
            Some(setup) if setup.user_id != user_id => Access::NotYours,
            Some(_) => setups
                .remove(&message_id)
                .map(Access::Granted)
                .unwrap_or(Access::Expired),
        }
    }

    pub async fn expire_setup(&self, message_id: u64) -> Option<TriviaSetup> {
        self.setups.write().await.remove(&message_id)
    }

    pub async fn ask(&self, message_id: u64, question: ActiveQuestion) {
        self.questions.write().await.insert(message_id, question);
    }

    /// Resolve an answer click. The question is consumed on the owner's first
    /// click; anyone else leaves it untouched.
    pub async fn answer(&self, message_id: u64, user_id: u64, choice: usize) -> Access<AnswerOutcome> {
        let mut questions = self.questions.write().await;
        match questions.get(&message_id) {
            None => Access::Expired,
            Some(active) if active.user_id != user_id => Access::NotYours,
            Some(_) => match questions.remove(&message_id) {
                Some(active) if active.question.is_correct(choice) => {
                    Access::Granted(AnswerOutcome::Correct)
                }
                Some(active) => Access::Granted(AnswerOutcome::Wrong {
                    correct: active.question.correct_answer().to_string(),
                }),
                None => Access::Expired,
            },
        }
    }

    pub async fn expire_question(&self, message_id: u64) -> Option<ActiveQuestion> {
        self.questions.write().await.remove(&message_id)
    }
}

/// Zero-based option index from an answer button id.
pub fn parse_answer_id(custom_id: &str) -> Option<usize> {
    custom_id
        .strip_prefix(ANSWER_PREFIX)?
        .parse::<usize>()
        .ok()?
        .checked_sub(1)
}

pub fn answer_id(index: usize) -> String {
    format!("{}{}", ANSWER_PREFIX, index + 1)
}

pub fn parse_category_value(value: &str) -> Option<u32> {
    if value == ANY_VALUE {
        None
    } else {
        value.parse().ok()
    }
}

pub fn parse_difficulty_value(value: &str) -> Option<Difficulty> {
    if value == ANY_VALUE {
        None
    } else {
        value.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn question() -> TriviaQuestion {
        TriviaQuestion {
            category: "Science".to_string(),
            difficulty: "easy".to_string(),
            question: "H2O is?".to_string(),
            options: vec!["Salt".to_string(), "Water".to_string(), "Air".to_string()],
            correct_index: 1,
        }
    }

    #[tokio::test]
    async fn answer_is_resolved_once() {
        let state = TriviaState::new();
        state
            .ask(10, ActiveQuestion { user_id: 1, question: question() })
            .await;

        assert_eq!(state.answer(10, 1, 1).await, Access::Granted(AnswerOutcome::Correct));
        assert_eq!(state.answer(10, 1, 1).await, Access::Expired);
        assert_eq!(state.expire_question(10).await, None);
    }

    #[tokio::test]
    async fn other_users_cannot_answer() {
        let state = TriviaState::new();
        state
            .ask(10, ActiveQuestion { user_id: 1, question: question() })
            .await;

        assert_eq!(state.answer(10, 2, 1).await, Access::NotYours);
        assert_eq!(
            state.answer(10, 1, 0).await,
            Access::Granted(AnswerOutcome::Wrong { correct: "Water".to_string() })
        );
    }

    #[tokio::test]
    async fn expiry_beats_late_answer() {
        let state = TriviaState::new();
        state
            .ask(10, ActiveQuestion { user_id: 1, question: question() })
            .await;

        assert!(state.expire_question(10).await.is_some());
        assert_eq!(state.answer(10, 1, 1).await, Access::Expired);
    }

    #[tokio::test]
    async fn setup_updates_are_owner_only() {
        let state = TriviaState::new();
        let categories = vec![TriviaCategory { id: 9, name: "General Knowledge".to_string() }];
        state.open_setup(5, TriviaSetup::new(1, categories)).await;

        assert_eq!(
            state.update_setup(5, 2, |setup| setup.category = Some(9)).await,
            Access::NotYours
        );
        let Access::Granted(setup) = state.update_setup(5, 1, |setup| setup.category = Some(9)).await
        else {
            panic!("owner update rejected");
        };
        assert_eq!(setup.category_name(), "General Knowledge");
        assert_eq!(setup.difficulty_label(), "Any difficulty");

        assert_eq!(state.take_setup(5, 2).await, Access::NotYours);
        assert!(matches!(state.take_setup(5, 1).await, Access::Granted(_)));
        assert_eq!(state.expire_setup(5).await, None);
    }

    #[test]
    fn answer_ids_are_one_based() {
        assert_eq!(answer_id(0), "trivia_answer_1");
        assert_eq!(parse_answer_id("trivia_answer_4"), Some(3));
        assert_eq!(parse_answer_id("trivia_answer_0"), None);
        assert_eq!(parse_answer_id("trivia_start"), None);
    }

    #[test]
    fn any_values_mean_no_preference() {
        assert_eq!(parse_category_value("any"), None);
        assert_eq!(parse_category_value("23"), Some(23));
        assert_eq!(parse_difficulty_value("any"), None);
        assert_eq!(parse_difficulty_value("hard"), Some(Difficulty::Hard));
    }
}
