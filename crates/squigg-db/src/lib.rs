pub mod models;
pub mod queries;

use anyhow::{Context, Result, anyhow};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::models::{Collection, Document};

/// Sort direction for [`Database::sorted_top`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Single-file JSON document store.
///
/// The whole document lives in memory behind one mutex. Every mutation
/// rewrites the backing file before the lock is released, so in-process
/// readers never see a half-applied write. Nothing guards against other
/// processes writing the same file.
pub struct Database {
    path: Option<PathBuf>,
    doc: Mutex<Document>,
}

impl Database {
    /// Open the document at `path`, creating it with empty collections if absent.
    /// An unreadable or corrupt document is an error.
    pub fn open(path: &Path) -> Result<Self> {
        let doc = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read database {}", path.display()))?;
            if raw.trim().is_empty() {
                Document::default()
            } else {
                serde_json::from_str(&raw)
                    .with_context(|| format!("Corrupt database document {}", path.display()))?
            }
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Document::default()
        };

        let db = Self {
            path: Some(path.to_path_buf()),
            doc: Mutex::new(doc),
        };
        // Write defaults back so a fresh file always has both collections.
        db.with_doc(|doc| db.flush(doc))?;

        let (users, squiggs) = db.with_doc(|doc| Ok((doc.users.len(), doc.squiggs.len())))?;
        info!(
            "Database opened at {} ({} users, {} squiggs)",
            path.display(),
            users,
            squiggs
        );
        Ok(db)
    }

    /// Store with no backing file. Mutations only touch memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            doc: Mutex::new(Document::default()),
        }
    }

    pub fn with_doc<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Document) -> Result<T>,
    {
        let doc = self.doc.lock().map_err(|e| anyhow!("DB lock poisoned: {}", e))?;
        f(&doc)
    }

    /// Apply `f` and flush the full document. If `f` or the flush fails the
    /// in-memory document is restored, keeping memory and disk in step.
    pub fn with_doc_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let mut doc = self.doc.lock().map_err(|e| anyhow!("DB lock poisoned: {}", e))?;
        let snapshot = doc.clone();

        let result = f(&mut doc).and_then(|value| {
            self.flush(&doc)?;
            Ok(value)
        });
        if result.is_err() {
            *doc = snapshot;
        }
        result
    }

    // -- Collection primitives --

    /// First record matching `predicate`, in insertion order.
    pub fn find<T, P>(&self, predicate: P) -> Result<Option<T>>
    where
        T: Collection,
        P: Fn(&T) -> bool,
    {
        self.with_doc(|doc| Ok(T::rows(doc).iter().find(|r| predicate(*r)).cloned()))
    }

    /// Stable sort by `key` in the given direction, then take the first `n`.
    /// Records with equal keys keep their insertion order.
    pub fn sorted_top<T, K, F>(&self, key: F, n: usize, order: Order) -> Result<Vec<T>>
    where
        T: Collection,
        K: Ord,
        F: Fn(&T) -> K,
    {
        self.with_doc(|doc| {
            let mut rows: Vec<&T> = T::rows(doc).iter().collect();
            rows.sort_by(|a, b| {
                let ord: Ordering = key(*a).cmp(&key(*b));
                match order {
                    Order::Ascending => ord,
                    Order::Descending => ord.reverse(),
                }
            });
            Ok(rows.into_iter().take(n).cloned().collect())
        })
    }

    /// Add `record` to the end of its collection and flush.
    pub fn append<T: Collection>(&self, record: T) -> Result<()> {
        self.with_doc_mut(|doc| {
            T::rows_mut(doc).push(record);
            Ok(())
        })
        .with_context(|| format!("Failed to append to {}", T::NAME))
    }

    pub fn count<T: Collection>(&self) -> Result<usize> {
        self.with_doc(|doc| Ok(T::rows(doc).len()))
    }

    fn flush(&self, doc: &Document) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(doc)?;
        fs::write(path, bytes)
            .with_context(|| format!("Failed to write database {}", path.display()))?;
        debug!("Flushed database to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SquiggRecord, UserRecord};
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn user(id: &str, username: &str) -> UserRecord {
        UserRecord {
            id: id.into(),
            username: username.into(),
            credential_hash: "00".into(),
        }
    }

    fn squigg(id: &str, voters: usize) -> SquiggRecord {
        SquiggRecord {
            id: id.into(),
            content: format!("squigg {id}"),
            author_id: "author".into(),
            created_at: Utc::now(),
            upvoter_ids: (0..voters).map(|i| format!("voter-{i}")).collect(),
            flagged_ids: BTreeSet::new(),
        }
    }

    #[test]
    fn open_creates_document_with_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let db = Database::open(&path).unwrap();
        assert_eq!(db.count::<UserRecord>().unwrap(), 0);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "users": [], "squiggs": [] }));
    }

    #[test]
    fn append_is_flushed_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        {
            let db = Database::open(&path).unwrap();
            db.append(user("u1", "ada")).unwrap();
            db.append(squigg("s1", 1)).unwrap();
        }

        let db = Database::open(&path).unwrap();
        let found: Option<UserRecord> = db.find(|u: &UserRecord| u.username == "ada").unwrap();
        assert_eq!(found.unwrap().id, "u1");
        assert_eq!(db.count::<SquiggRecord>().unwrap(), 1);
    }

    #[test]
    fn corrupt_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(Database::open(&path).is_err());
    }

    #[test]
    fn missing_collection_defaults_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, r#"{"users": []}"#).unwrap();

        let db = Database::open(&path).unwrap();
        assert_eq!(db.count::<SquiggRecord>().unwrap(), 0);
    }

    #[test]
    fn find_returns_first_match_in_insertion_order() {
        let db = Database::in_memory();
        db.append(user("u1", "dup")).unwrap();
        db.append(user("u2", "dup")).unwrap();

        let found: UserRecord = db.find(|u: &UserRecord| u.username == "dup").unwrap().unwrap();
        assert_eq!(found.id, "u1");

        let missing: Option<UserRecord> = db.find(|u: &UserRecord| u.username == "nobody").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn sorted_top_orders_and_truncates() {
        let db = Database::in_memory();
        for (id, votes) in [("a", 1), ("b", 5), ("c", 3), ("d", 5)] {
            db.append(squigg(id, votes)).unwrap();
        }

        let desc: Vec<SquiggRecord> = db
            .sorted_top(|s: &SquiggRecord| s.upvoter_ids.len(), 3, Order::Descending)
            .unwrap();
        let ids: Vec<&str> = desc.iter().map(|s| s.id.as_str()).collect();
        // ties keep insertion order
        assert_eq!(ids, ["b", "d", "c"]);

        let asc: Vec<SquiggRecord> = db
            .sorted_top(|s: &SquiggRecord| s.upvoter_ids.len(), 10, Order::Ascending)
            .unwrap();
        let ids: Vec<&str> = asc.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "b", "d"]);
    }

    #[test]
    fn failed_mutation_is_rolled_back() {
        let db = Database::in_memory();
        db.append(user("u1", "ada")).unwrap();

        let res: Result<()> = db.with_doc_mut(|doc| {
            doc.users.clear();
            Err(anyhow!("boom"))
        });
        assert!(res.is_err());
        assert_eq!(db.count::<UserRecord>().unwrap(), 1);
    }

    #[test]
    fn failed_flush_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let db = Database::open(&path).unwrap();

        // A directory where the file should be makes the rewrite fail.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = db.append(user("u1", "ada")).unwrap_err();
        assert!(err.to_string().contains("users"));
        assert_eq!(db.count::<UserRecord>().unwrap(), 0);
    }
}
