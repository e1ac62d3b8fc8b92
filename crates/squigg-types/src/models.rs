use serde::{Deserialize, Serialize};

/// An authenticated identity as seen outside the identity service.
/// Username and credential hash never leave the store through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
}

/// Display-ready projection of a stored squigg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquiggView {
    pub id: String,
    pub content: String,
    pub author_id: String,
    /// Human-readable, e.g. "March 4, 2017 at 09:15 UTC".
    pub created_at: String,
    pub upvoter_ids: Vec<String>,
    pub upvotes: usize,
}

// -- View locals --

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Context {
    pub user: Option<User>,
    pub squiggs: Vec<SquiggView>,
}

/// Everything the index template is rendered from.
#[derive(Debug, Clone, Serialize)]
pub struct Locals {
    pub meta: Meta,
    pub context: Context,
}
