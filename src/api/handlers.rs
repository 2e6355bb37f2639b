use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    models::ticket::{Ticket, TicketId},
    persisters::persister::TicketPersister,
    services::ticket::TicketService,
};

use super::{
    error::ApiError,
    links::{collection_links, ticket_links, Links, RouteTable},
    validation::{validate_assignee, validate_category, validate_ticket},
};

pub struct AppState<Persister> {
    pub service: TicketService<Persister>,
    pub routes: RouteTable,
}

type SharedState<Persister> = State<Arc<AppState<Persister>>>;

#[derive(Debug, Serialize)]
pub struct TicketResource {
    #[serde(flatten)]
    pub ticket: Ticket,
    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Serialize)]
pub struct TicketCollection {
    pub tickets: Vec<TicketResource>,
    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Deserialize)]
pub struct AssignParams {
    pub assignee: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategorizeParams {
    pub category: Option<String>,
}

impl<Persister> AppState<Persister> {
    fn resource(&self, ticket: Ticket) -> TicketResource {
        let links = ticket_links(&ticket, &self.routes);
        TicketResource { ticket, links }
    }
}

pub async fn create_ticket<Persister: TicketPersister + 'static>(
    State(state): SharedState<Persister>,
    payload: Result<Json<Ticket>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(ticket) = payload?;
    validate_ticket(&ticket)?;
    let created = state.service.create(ticket).await?;
    let resource = state.resource(created);
    let location = resource
        .links
        .self_link
        .as_ref()
        .map(|link| link.href.clone())
        .unwrap_or_else(|| state.routes.collection());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(resource),
    ))
}

pub async fn list_tickets<Persister: TicketPersister + 'static>(
    State(state): SharedState<Persister>,
) -> Result<Json<TicketCollection>, ApiError> {
    let tickets = state
        .service
        .list_all()
        .await?
        .into_iter()
        .map(|ticket| state.resource(ticket))
        .collect();
    Ok(Json(TicketCollection {
        tickets,
        links: collection_links(&state.routes),
    }))
}

pub async fn get_ticket<Persister: TicketPersister + 'static>(
    State(state): SharedState<Persister>,
    path: Result<Path<TicketId>, PathRejection>,
) -> Result<Json<TicketResource>, ApiError> {
    let Path(id) = path?;
    let ticket = state
        .service
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(id))?;
    Ok(Json(state.resource(ticket)))
}

pub async fn update_ticket<Persister: TicketPersister + 'static>(
    State(state): SharedState<Persister>,
    path: Result<Path<TicketId>, PathRejection>,
    payload: Result<Json<Ticket>, JsonRejection>,
) -> Result<Json<TicketResource>, ApiError> {
    let Path(id) = path?;
    let Json(ticket) = payload?;
    validate_ticket(&ticket)?;
    let updated = state.service.update(id, ticket).await?;
    Ok(Json(state.resource(updated)))
}

pub async fn delete_ticket<Persister: TicketPersister + 'static>(
    State(state): SharedState<Persister>,
    path: Result<Path<TicketId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_ticket<Persister: TicketPersister + 'static>(
    State(state): SharedState<Persister>,
    path: Result<Path<TicketId>, PathRejection>,
    params: Result<Query<AssignParams>, QueryRejection>,
) -> Result<Json<TicketResource>, ApiError> {
    let Path(id) = path?;
    let Query(params) = params?;
    let assignee = validate_assignee(params.assignee)?;
    let ticket = state
        .service
        .assign(id, assignee)
        .await?
        .ok_or_else(|| ApiError::not_found(id))?;
    Ok(Json(state.resource(ticket)))
}

pub async fn categorize_ticket<Persister: TicketPersister + 'static>(
    State(state): SharedState<Persister>,
    path: Result<Path<TicketId>, PathRejection>,
    params: Result<Query<CategorizeParams>, QueryRejection>,
) -> Result<Json<TicketResource>, ApiError> {
    let Path(id) = path?;
    let Query(params) = params?;
    let category = validate_category(params.category)?;
    let ticket = state
        .service
        .categorize(id, category)
        .await?
        .ok_or_else(|| ApiError::not_found(id))?;
    Ok(Json(state.resource(ticket)))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
