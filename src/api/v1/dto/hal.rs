//! HAL-style `_links` for lecture representations.
//!
//! Turns the renderer's action set into `{ rel: { href } }` entries. Which
//! actions appear is decided elsewhere (`services::auth::affordances`).

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::services::auth::affordances::ActionName;

pub const LECTURES_PATH: &str = "/api/v1/lectures";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

pub type Links = BTreeMap<&'static str, Link>;

pub fn lecture_href(public_id: &str) -> String {
    format!("{}/{}", LECTURES_PATH, public_id)
}

/// `self` (when given) plus one link per action.
/// `update-lecture` is only emitted when there is a lecture to point at.
pub fn links_for(actions: &BTreeSet<ActionName>, self_href: Option<&str>) -> Links {
    let mut links = Links::new();

    if let Some(href) = self_href {
        links.insert("self", Link { href: href.to_string() });
    }

    for action in actions {
        let href = match action {
            ActionName::Query | ActionName::Create => LECTURES_PATH.to_string(),
            ActionName::Update => match self_href {
                Some(href) => href.to_string(),
                None => continue,
            },
        };
        links.insert(action.rel(), Link { href });
    }

    links
}
