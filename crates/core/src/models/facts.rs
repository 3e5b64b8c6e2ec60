use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomFact {
    pub text: String,
    #[serde(default)]
    pub source_url: Option<String>,
}
