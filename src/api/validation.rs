use thiserror::Error;

use crate::models::ticket::{Category, Ticket, UnknownCategory};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("{0} is required")]
    Missing(&'static str),
    #[error(transparent)]
    Category(#[from] UnknownCategory),
}

/// Checks a create or update payload.
pub fn validate_ticket(ticket: &Ticket) -> Result<(), ValidationError> {
    not_blank("title", &ticket.title)?;
    not_blank("creator", &ticket.creator)
}

pub fn validate_assignee(assignee: Option<String>) -> Result<String, ValidationError> {
    let assignee = assignee.ok_or(ValidationError::Missing("assignee"))?;
    not_blank("assignee", &assignee)?;
    Ok(assignee)
}

pub fn validate_category(category: Option<String>) -> Result<Category, ValidationError> {
    let category = category.ok_or(ValidationError::Missing("category"))?;
    Ok(category.parse()?)
}

fn not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Blank(field))
    } else {
        Ok(())
    }
}
