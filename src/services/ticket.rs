use crate::{
    models::ticket::{Category, Ticket, TicketId},
    persisters::persister::{PersistError, TicketPersister},
};

/// Ticket operations on top of a [`TicketPersister`].
///
/// Holds nothing but the persister. Lookups that miss return `Ok(None)`;
/// persister failures are passed through untouched.
#[derive(Debug, Clone)]
pub struct TicketService<Persister> {
    persister: Persister,
}

impl<Persister: TicketPersister> TicketService<Persister> {
    pub fn new(persister: Persister) -> Self {
        Self { persister }
    }

    pub async fn create(&self, mut ticket: Ticket) -> Result<Ticket, PersistError> {
        ticket.id = None;
        let created = self.persister.save(ticket).await?;
        log::debug!("created ticket {:?}", created.id);
        Ok(created)
    }

    pub async fn list_all(&self) -> Result<Vec<Ticket>, PersistError> {
        self.persister.find_all().await
    }

    pub async fn get_by_id(&self, id: TicketId) -> Result<Option<Ticket>, PersistError> {
        self.persister.find_by_id(id).await
    }

    /// Replaces every field of ticket `id` with `replacement`.
    ///
    /// When no ticket exists under `id` the replacement is stored under
    /// that id instead.
    pub async fn update(&self, id: TicketId, replacement: Ticket) -> Result<Ticket, PersistError> {
        let ticket = match self.persister.find_by_id(id).await? {
            Some(mut existing) => {
                log::debug!("updating ticket {id}");
                existing.replace_fields(replacement);
                existing
            }
            None => {
                log::debug!("ticket {id} not found, storing replacement under that id");
                Ticket {
                    id: Some(id),
                    ..replacement
                }
            }
        };
        self.persister.save(ticket).await
    }

    pub async fn assign(
        &self,
        id: TicketId,
        assignee: String,
    ) -> Result<Option<Ticket>, PersistError> {
        log::debug!("assigning ticket {id} to {assignee}");
        self.modify(id, |ticket| ticket.assignee = Some(assignee)).await
    }

    pub async fn categorize(
        &self,
        id: TicketId,
        category: Category,
    ) -> Result<Option<Ticket>, PersistError> {
        log::debug!("categorizing ticket {id} as {category}");
        self.modify(id, |ticket| ticket.category = Some(category)).await
    }

    pub async fn delete(&self, id: TicketId) -> Result<(), PersistError> {
        log::debug!("deleting ticket {id}");
        self.persister.delete_by_id(id).await
    }

    // never creates a ticket: a miss returns None without writing
    async fn modify(
        &self,
        id: TicketId,
        change: impl FnOnce(&mut Ticket),
    ) -> Result<Option<Ticket>, PersistError> {
        let Some(mut ticket) = self.persister.find_by_id(id).await? else {
            log::debug!("ticket {id} not found");
            return Ok(None);
        };
        change(&mut ticket);
        self.persister.save(ticket).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;

    use crate::persisters::in_memory::InMemoryPersister;

    use super::*;

    /// Wraps the in-memory persister and counts writes.
    #[derive(Clone, Default)]
    struct CountingPersister {
        inner: InMemoryPersister,
        saves: Arc<AtomicUsize>,
    }

    impl CountingPersister {
        fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TicketPersister for CountingPersister {
        async fn save(&self, ticket: Ticket) -> Result<Ticket, PersistError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(ticket).await
        }

        async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, PersistError> {
            self.inner.find_by_id(id).await
        }

        async fn find_all(&self) -> Result<Vec<Ticket>, PersistError> {
            self.inner.find_all().await
        }

        async fn delete_by_id(&self, id: TicketId) -> Result<(), PersistError> {
            self.inner.delete_by_id(id).await
        }
    }

    #[derive(Clone)]
    struct UnavailablePersister;

    #[async_trait]
    impl TicketPersister for UnavailablePersister {
        async fn save(&self, _ticket: Ticket) -> Result<Ticket, PersistError> {
            Err(unavailable("save"))
        }

        async fn find_by_id(&self, _id: TicketId) -> Result<Option<Ticket>, PersistError> {
            Err(unavailable("find"))
        }

        async fn find_all(&self) -> Result<Vec<Ticket>, PersistError> {
            Err(unavailable("find all"))
        }

        async fn delete_by_id(&self, _id: TicketId) -> Result<(), PersistError> {
            Err(unavailable("delete"))
        }
    }

    fn unavailable(operation: &str) -> PersistError {
        PersistError::Execution("connection refused".to_string(), operation.to_string())
    }

    fn ticket_1() -> Ticket {
        Ticket {
            id: None,
            title: "Ticket 1".to_string(),
            description: "Descripción del ticket 1".to_string(),
            status: "ABIERTO".to_string(),
            category: Some(Category::Software),
            assignee: Some("Usuario1".to_string()),
            creator: "Admin".to_string(),
        }
    }

    fn ticket_1_updated() -> Ticket {
        Ticket {
            id: None,
            title: "Ticket 1 Actualizado".to_string(),
            description: "Descripción actualizada".to_string(),
            status: "CERRADO".to_string(),
            category: Some(Category::Hardware),
            assignee: Some("Usuario2".to_string()),
            creator: "Soporte".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_keeps_fields() {
        let service = TicketService::new(InMemoryPersister::new());
        let created = service.create(ticket_1()).await.unwrap();

        assert!(created.id.is_some());
        assert_eq!(
            Ticket {
                id: None,
                ..created.clone()
            },
            ticket_1()
        );
        assert_eq!(
            Some(created.clone()),
            service.get_by_id(created.id.unwrap()).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_ignores_caller_id() {
        let service = TicketService::new(InMemoryPersister::new());
        let requested = TicketId::new_v4();
        let created = service
            .create(Ticket {
                id: Some(requested),
                ..ticket_1()
            })
            .await
            .unwrap();

        assert_ne!(Some(requested), created.id);
        assert_eq!(None, service.get_by_id(requested).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_all() {
        let service = TicketService::new(InMemoryPersister::new());
        assert!(service.list_all().await.unwrap().is_empty());

        let first = service.create(ticket_1()).await.unwrap();
        let second = service.create(ticket_1_updated()).await.unwrap();
        assert_eq!(vec![first, second], service.list_all().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let service = TicketService::new(InMemoryPersister::new());
        assert_eq!(None, service.get_by_id(TicketId::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_existing_replaces_all_fields() {
        let persister = CountingPersister::default();
        let service = TicketService::new(persister.clone());
        let id = service.create(ticket_1()).await.unwrap().id.unwrap();

        let updated = service
            .update(
                id,
                Ticket {
                    id: Some(TicketId::new_v4()),
                    ..ticket_1_updated()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            Ticket {
                id: Some(id),
                ..ticket_1_updated()
            },
            updated
        );
        assert_eq!(Some(updated), service.get_by_id(id).await.unwrap());
        assert_eq!(2, persister.saves());
        assert_eq!(1, service.list_all().await.unwrap().len());
    }

    #[tokio::test]
    async fn test_update_missing_stores_under_requested_id() {
        let service = TicketService::new(InMemoryPersister::new());
        let id = TicketId::new_v4();

        let upserted = service.update(id, ticket_1_updated()).await.unwrap();

        assert_eq!(Some(id), upserted.id);
        assert_eq!(
            Ticket {
                id: Some(id),
                ..ticket_1_updated()
            },
            upserted
        );
        assert_eq!(Some(upserted), service.get_by_id(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_assign_changes_only_assignee() {
        let service = TicketService::new(InMemoryPersister::new());
        let before = service.create(ticket_1()).await.unwrap();
        let id = before.id.unwrap();

        let after = service
            .assign(id, "Usuario2".to_string())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            Ticket {
                assignee: Some("Usuario2".to_string()),
                ..before
            },
            after
        );
        assert_eq!(Some(after), service.get_by_id(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_categorize_changes_only_category() {
        let service = TicketService::new(InMemoryPersister::new());
        let before = service.create(ticket_1()).await.unwrap();
        let id = before.id.unwrap();

        let after = service
            .categorize(id, Category::Hardware)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            Ticket {
                category: Some(Category::Hardware),
                ..before
            },
            after
        );
    }

    #[tokio::test]
    async fn test_assign_and_categorize_missing_do_not_write() {
        let persister = CountingPersister::default();
        let service = TicketService::new(persister.clone());
        let id = TicketId::new_v4();

        assert_eq!(None, service.assign(id, "Usuario2".to_string()).await.unwrap());
        assert_eq!(None, service.categorize(id, Category::Network).await.unwrap());
        assert_eq!(0, persister.saves());
        assert_eq!(None, service.get_by_id(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = TicketService::new(InMemoryPersister::new());
        let id = service.create(ticket_1()).await.unwrap().id.unwrap();

        service.delete(id).await.unwrap();
        assert_eq!(None, service.get_by_id(id).await.unwrap());
        service.delete(id).await.unwrap();
        service.delete(TicketId::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn test_persister_errors_propagate() {
        let service = TicketService::new(UnavailablePersister);
        let id = TicketId::new_v4();

        assert!(matches!(
            service.create(ticket_1()).await,
            Err(PersistError::Execution(_, op)) if op == "save"
        ));
        assert!(service.list_all().await.is_err());
        assert!(service.get_by_id(id).await.is_err());
        assert!(matches!(
            service.update(id, ticket_1()).await,
            Err(PersistError::Execution(_, op)) if op == "find"
        ));
        assert!(service.assign(id, "Usuario2".to_string()).await.is_err());
        assert!(service.categorize(id, Category::Other).await.is_err());
        assert!(matches!(
            service.delete(id).await,
            Err(PersistError::Execution(_, op)) if op == "delete"
        ));
    }
}
