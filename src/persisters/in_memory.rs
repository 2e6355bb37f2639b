use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;

use crate::models::ticket::{Ticket, TicketId};

use super::persister::{PersistError, TicketPersister};

#[derive(Debug, Clone, Default)]
pub struct InMemoryPersister {
    tickets: Arc<RwLock<Tickets>>,
}

#[derive(Debug, Default)]
struct Tickets {
    by_id: HashMap<TicketId, StoredTicket>,
    next_sequence: u64,
}

#[derive(Debug)]
struct StoredTicket {
    sequence: u64,
    ticket: Ticket,
}

impl InMemoryPersister {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketPersister for InMemoryPersister {
    async fn save(&self, mut ticket: Ticket) -> Result<Ticket, PersistError> {
        let id = *ticket.id.get_or_insert_with(TicketId::new_v4);
        let mut tickets = self
            .tickets
            .write()
            .map_err(|_| PersistError::Poisoned("tickets"))?;
        let sequence = match tickets.by_id.get(&id).map(|stored| stored.sequence) {
            Some(sequence) => sequence,
            None => {
                tickets.next_sequence += 1;
                tickets.next_sequence
            }
        };
        log::trace!("storing ticket {id} at sequence {sequence}");
        tickets.by_id.insert(
            id,
            StoredTicket {
                sequence,
                ticket: ticket.clone(),
            },
        );
        Ok(ticket)
    }

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, PersistError> {
        log::trace!("retrieving ticket {id}");
        Ok(self
            .tickets
            .read()
            .map_err(|_| PersistError::Poisoned("tickets"))?
            .by_id
            .get(&id)
            .map(|stored| stored.ticket.clone()))
    }

    async fn find_all(&self) -> Result<Vec<Ticket>, PersistError> {
        let tickets = self
            .tickets
            .read()
            .map_err(|_| PersistError::Poisoned("tickets"))?;
        let mut stored: Vec<&StoredTicket> = tickets.by_id.values().collect();
        stored.sort_by_key(|stored| stored.sequence);
        Ok(stored.into_iter().map(|s| s.ticket.clone()).collect())
    }

    async fn delete_by_id(&self, id: TicketId) -> Result<(), PersistError> {
        let removed = self
            .tickets
            .write()
            .map_err(|_| PersistError::Poisoned("tickets"))?
            .by_id
            .remove(&id);
        log::trace!("deleting ticket {id}, present: {}", removed.is_some());
        Ok(())
    }
}
