pub mod spotify;
pub mod webhook;
