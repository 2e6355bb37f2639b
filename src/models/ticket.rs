use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub type TicketId = Uuid;

/// A support ticket.
///
/// `id` is `None` until the ticket has been saved by a persister.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Ticket {
    #[serde(default)]
    pub id: Option<TicketId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub assignee: Option<String>,
    pub creator: String,
}

impl Ticket {
    /// Copies every field except `id` from `other`.
    pub fn replace_fields(&mut self, other: Ticket) {
        self.title = other.title;
        self.description = other.description;
        self.status = other.status;
        self.category = other.category;
        self.assignee = other.assignee;
        self.creator = other.creator;
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Software,
    Hardware,
    Network,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Software => "SOFTWARE",
            Category::Hardware => "HARDWARE",
            Category::Network => "NETWORK",
            Category::Other => "OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SOFTWARE" => Ok(Category::Software),
            "HARDWARE" => Ok(Category::Hardware),
            "NETWORK" => Ok(Category::Network),
            "OTHER" => Ok(Category::Other),
            _ => Err(UnknownCategory(value.to_string())),
        }
    }
}

// same rule as the query parameter: case-insensitive
impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}
