//! In-memory state for the bot, keyed by guild id.
//!
//! Nothing here survives a restart. Repositories are cheap to clone and share
//! one map behind a `tokio::sync::RwLock`.

pub mod models;
pub mod repositories;

use repositories::{queue::QueueRepository, sales::SalesRepository};

#[derive(Debug, Clone, Default)]
pub struct Store {
    pub sales: SalesRepository,
    pub queues: QueueRepository,
}

pub fn create_store() -> Store {
    Store::default()
}
