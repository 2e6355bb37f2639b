use ticket_desk::{
    models::ticket::{Category, Ticket},
    persisters::in_memory::InMemoryPersister,
    services::ticket::TicketService,
};

#[tokio::test]
async fn test_create_get_assign_categorize_delete() {
    let service = TicketService::new(InMemoryPersister::new());
    let input = Ticket {
        id: None,
        title: "Ticket 1".to_string(),
        description: "Descripción del ticket 1".to_string(),
        status: "ABIERTO".to_string(),
        category: Some(Category::Software),
        assignee: Some("Usuario1".to_string()),
        creator: "Admin".to_string(),
    };

    let created = service.create(input.clone()).await.unwrap();
    let id = created.id.expect("created ticket has an id");
    assert_eq!(Ticket { id: Some(id), ..input }, created);

    let fetched = service.get_by_id(id).await.unwrap();
    assert_eq!(Some(created.clone()), fetched);

    let assigned = service
        .assign(id, "Usuario2".to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(Some(Category::Software), assigned.category);
    assert_eq!(Some("Usuario2"), assigned.assignee.as_deref());

    let categorized = service
        .categorize(id, Category::Hardware)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(Some("Usuario2"), categorized.assignee.as_deref());
    assert_eq!(Some(Category::Hardware), categorized.category);
    assert_eq!(
        Ticket {
            assignee: Some("Usuario2".to_string()),
            category: Some(Category::Hardware),
            ..created
        },
        categorized
    );

    service.delete(id).await.unwrap();
    assert_eq!(None, service.get_by_id(id).await.unwrap());
    service.delete(id).await.unwrap();
}

#[tokio::test]
async fn test_last_write_wins() {
    let service = TicketService::new(InMemoryPersister::new());
    let created = service
        .create(Ticket {
            id: None,
            title: "Shared".to_string(),
            description: String::new(),
            status: "OPEN".to_string(),
            category: None,
            assignee: None,
            creator: "Admin".to_string(),
        })
        .await
        .unwrap();
    let id = created.id.unwrap();

    service.assign(id, "Usuario1".to_string()).await.unwrap();
    service.assign(id, "Usuario2".to_string()).await.unwrap();
    // a full update replaces the assignee written just before it
    let replaced = service
        .update(
            id,
            Ticket {
                assignee: Some("Usuario3".to_string()),
                ..created.clone()
            },
        )
        .await
        .unwrap();
    assert_eq!(Some("Usuario3"), replaced.assignee.as_deref());
    service.categorize(id, Category::Network).await.unwrap();

    let stored = service.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(Some("Usuario3"), stored.assignee.as_deref());
    assert_eq!(Some(Category::Network), stored.category);
    assert_eq!(1, service.list_all().await.unwrap().len());
}
