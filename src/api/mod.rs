pub mod error;
pub mod handlers;
pub mod links;
pub mod validation;

use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::{persisters::persister::TicketPersister, services::ticket::TicketService};

use self::{handlers::AppState, links::RouteTable};

pub const TICKETS_PATH: &str = "/tickets";

pub fn router<Persister>(service: TicketService<Persister>, routes: RouteTable) -> Router
where
    Persister: TicketPersister + 'static,
{
    let state = Arc::new(AppState { service, routes });
    let item = format!("{TICKETS_PATH}/:id");
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            TICKETS_PATH,
            get(handlers::list_tickets::<Persister>).post(handlers::create_ticket::<Persister>),
        )
        .route(
            &item,
            get(handlers::get_ticket::<Persister>)
                .put(handlers::update_ticket::<Persister>)
                .delete(handlers::delete_ticket::<Persister>),
        )
        .route(
            &format!("{item}/assign"),
            put(handlers::assign_ticket::<Persister>),
        )
        .route(
            &format!("{item}/categorize"),
            put(handlers::categorize_ticket::<Persister>),
        )
        .with_state(state)
}
