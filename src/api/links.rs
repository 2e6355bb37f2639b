//! Hypermedia links attached to ticket responses.

use serde::Serialize;

use crate::models::ticket::Ticket;

/// Where the ticket routes are reachable from the outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    base_url: String,
    collection_path: String,
}

impl RouteTable {
    pub fn new(base_url: &str, collection_path: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            collection_path: format!("/{}", collection_path.trim_matches('/')),
        }
    }

    pub fn collection(&self) -> String {
        format!("{}{}", self.base_url, self.collection_path)
    }

    pub fn item(&self, id: impl std::fmt::Display) -> String {
        format!("{}/{id}", self.collection())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

impl Link {
    fn new(href: String) -> Self {
        Self { href }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Links {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorize: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<Link>,
}

/// Links for a single ticket. A ticket without an id only links to the
/// collection.
pub fn ticket_links(ticket: &Ticket, routes: &RouteTable) -> Links {
    let tickets = Some(Link::new(routes.collection()));
    let Some(id) = ticket.id else {
        return Links {
            self_link: None,
            tickets,
            assign: None,
            categorize: None,
            update: None,
        };
    };
    let item = routes.item(id);
    let assignee = ticket.assignee.as_deref().map(|a| ("assignee", a));
    let category = ticket.category.map(|c| ("category", c.as_str()));
    Links {
        self_link: Some(Link::new(item.clone())),
        tickets,
        assign: Some(Link::new(with_query(format!("{item}/assign"), assignee))),
        categorize: Some(Link::new(with_query(
            format!("{item}/categorize"),
            category,
        ))),
        update: Some(Link::new(item)),
    }
}

pub fn collection_links(routes: &RouteTable) -> Links {
    Links {
        self_link: Some(Link::new(routes.collection())),
        tickets: None,
        assign: None,
        categorize: None,
        update: None,
    }
}

fn with_query(href: String, param: Option<(&str, &str)>) -> String {
    let Some(param) = param else {
        return href;
    };
    match serde_urlencoded::to_string([param]) {
        Ok(query) => format!("{href}?{query}"),
        Err(e) => {
            log::warn!("dropping query {param:?} from {href}: {e}");
            href
        }
    }
}
