pub mod health;
pub mod spotify;
pub mod webhook;
