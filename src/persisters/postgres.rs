use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::models::ticket::{Category, Ticket, TicketId};

use super::persister::{PersistError, TicketPersister};

type TicketRow = (
    TicketId,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
);

const SELECT_TICKET: &str =
    "SELECT id, title, description, status, category, assignee, creator FROM tickets";

#[derive(Debug, Clone)]
pub struct SqlxPersister {
    pool: Pool<Postgres>,
}

impl SqlxPersister {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, PersistError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| PersistError::Execution(e.to_string(), "connect".to_string()))?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), PersistError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PersistError::Execution(e.to_string(), "migrate".to_string()))
    }
}

#[async_trait]
impl TicketPersister for SqlxPersister {
    async fn save(&self, mut ticket: Ticket) -> Result<Ticket, PersistError> {
        let id = *ticket.id.get_or_insert_with(TicketId::new_v4);
        sqlx::query(
            "INSERT INTO tickets (id, title, description, status, category, assignee, creator)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (id) DO UPDATE SET
                    title = EXCLUDED.title,
                    description = EXCLUDED.description,
                    status = EXCLUDED.status,
                    category = EXCLUDED.category,
                    assignee = EXCLUDED.assignee,
                    creator = EXCLUDED.creator",
        )
        .bind(id)
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(&ticket.status)
        .bind(ticket.category.map(|c| c.as_str()))
        .bind(&ticket.assignee)
        .bind(&ticket.creator)
        .execute(&self.pool)
        .await
        .map_err(|e| PersistError::Execution(e.to_string(), "save ticket".to_string()))?;
        Ok(ticket)
    }

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, PersistError> {
        let row: Option<TicketRow> = sqlx::query_as(&format!("{SELECT_TICKET} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PersistError::Execution(e.to_string(), "find ticket".to_string()))?;
        row.map(ticket_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Ticket>, PersistError> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!("{SELECT_TICKET} ORDER BY seq"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PersistError::Execution(e.to_string(), "list tickets".to_string()))?;
        rows.into_iter().map(ticket_from_row).collect()
    }

    async fn delete_by_id(&self, id: TicketId) -> Result<(), PersistError> {
        sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| PersistError::Execution(e.to_string(), "delete ticket".to_string()))
    }
}

fn ticket_from_row(row: TicketRow) -> Result<Ticket, PersistError> {
    let (id, title, description, status, category, assignee, creator) = row;
    let category = category
        .map(|c| c.parse::<Category>())
        .transpose()
        .map_err(|e| PersistError::Corrupted(format!("{id}: {e}")))?;
    Ok(Ticket {
        id: Some(id),
        title,
        description,
        status,
        category,
        assignee,
        creator,
    })
}
