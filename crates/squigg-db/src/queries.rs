use crate::models::{SquiggRecord, UserRecord};
use crate::{Database, Order};
use anyhow::Result;
use tracing::debug;

impl Database {
    // -- Users --

    /// Insert a user unless the username is already taken.
    /// Returns `false` without writing when it is.
    pub fn create_user(&self, record: UserRecord) -> Result<bool> {
        if self.get_user_by_username(&record.username)?.is_some() {
            return Ok(false);
        }

        // Re-check under the write lock; another sign-up may have landed in between.
        self.with_doc_mut(|doc| {
            if doc.users.iter().any(|u| u.username == record.username) {
                return Ok(false);
            }
            debug!("Creating user {}", record.id);
            doc.users.push(record);
            Ok(true)
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        self.find(|u: &UserRecord| u.username == username)
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        self.find(|u: &UserRecord| u.id == id)
    }

    // -- Squiggs --

    pub fn insert_squigg(&self, record: SquiggRecord) -> Result<()> {
        debug!("Inserting squigg {} by {}", record.id, record.author_id);
        self.append(record)
    }

    pub fn get_squigg_by_id(&self, id: &str) -> Result<Option<SquiggRecord>> {
        self.find(|s: &SquiggRecord| s.id == id)
    }

    /// Up to `limit` squiggs, most upvoters first.
    pub fn top_squiggs(&self, limit: usize) -> Result<Vec<SquiggRecord>> {
        self.sorted_top(
            |s: &SquiggRecord| s.upvoter_ids.len(),
            limit,
            Order::Descending,
        )
    }
}
