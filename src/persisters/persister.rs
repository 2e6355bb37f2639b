use async_trait::async_trait;
use thiserror::Error;

use crate::models::ticket::{Ticket, TicketId};

/// Keyed storage for tickets.
///
/// `save` assigns a fresh id when the ticket has none and otherwise
/// replaces whatever is stored under that id.
#[async_trait]
pub trait TicketPersister: Send + Sync {
    async fn save(&self, ticket: Ticket) -> Result<Ticket, PersistError>;
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, PersistError>;
    async fn find_all(&self) -> Result<Vec<Ticket>, PersistError>;
    async fn delete_by_id(&self, id: TicketId) -> Result<(), PersistError>;
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to persist: {1} failed with {0}")]
    Execution(String, String),
    #[error("Failed to persist: {0} lock poisoned")]
    Poisoned(&'static str),
    #[error("Failed to persist: corrupted row {0}")]
    Corrupted(String),
}

