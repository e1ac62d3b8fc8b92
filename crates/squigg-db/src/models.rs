//! Record types stored in the JSON document.
//! Distinct from squigg-types API models to keep the store independent of the wire format.
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub credential_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquiggRecord {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub upvoter_ids: BTreeSet<String>,
    #[serde(default)]
    pub flagged_ids: BTreeSet<String>,
}

/// The whole on-disk document. Missing collections default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub squiggs: Vec<SquiggRecord>,
}

/// A named top-level collection of the document.
pub trait Collection: Clone {
    const NAME: &'static str;

    fn rows(doc: &Document) -> &Vec<Self>;
    fn rows_mut(doc: &mut Document) -> &mut Vec<Self>;
}

impl Collection for UserRecord {
    const NAME: &'static str = "users";

    fn rows(doc: &Document) -> &Vec<Self> {
        &doc.users
    }

    fn rows_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.users
    }
}

impl Collection for SquiggRecord {
    const NAME: &'static str = "squiggs";

    fn rows(doc: &Document) -> &Vec<Self> {
        &doc.squiggs
    }

    fn rows_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.squiggs
    }
}
