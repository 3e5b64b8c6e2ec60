pub mod facts;
pub mod llm;
pub mod sales;
pub mod spotify;
pub mod trivia;
pub mod weather;
pub mod webhook;
