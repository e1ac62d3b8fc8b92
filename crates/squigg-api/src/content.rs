use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use squigg_crypto::ids;
use squigg_db::{Database, models::SquiggRecord};
use squigg_types::models::SquiggView;

use crate::error::ServiceError;

/// How many squiggs the front page shows.
pub const DEFAULT_TOP_SQUIGGS: usize = 5;

pub struct ContentService {
    db: Arc<Database>,
}

impl ContentService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The author is recorded as the first upvoter.
    pub fn create_squigg(&self, content: &str, author_id: &str) -> Result<SquiggView, ServiceError> {
        let content = content.trim();
        if content.is_empty() || author_id.is_empty() {
            return Err(ServiceError::InvalidInput(
                "A squigg needs content and an author.".into(),
            ));
        }

        let record = SquiggRecord {
            id: ids::generate(),
            content: content.to_string(),
            author_id: author_id.to_string(),
            created_at: Utc::now(),
            upvoter_ids: BTreeSet::from([author_id.to_string()]),
            flagged_ids: BTreeSet::new(),
        };

        self.db.insert_squigg(record.clone())?;
        info!("User {} posted squigg {}", record.author_id, record.id);

        Ok(project(record))
    }

    /// Up to `limit` squiggs, most upvoted first. An empty store yields an empty list.
    pub fn get_top_squiggs(&self, limit: usize) -> Result<Vec<SquiggView>, ServiceError> {
        let rows = self.db.top_squiggs(limit)?;
        Ok(rows.into_iter().map(project).collect())
    }
}

pub fn project(record: SquiggRecord) -> SquiggView {
    SquiggView {
        created_at: display_time(record.created_at),
        upvotes: record.upvoter_ids.len(),
        upvoter_ids: record.upvoter_ids.into_iter().collect(),
        id: record.id,
        content: record.content,
        author_id: record.author_id,
    }
}

fn display_time(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y at %H:%M UTC").to_string()
}
