use std::sync::Arc;

use tracing::{debug, info};

use squigg_crypto::{hash::KeyedHasher, ids};
use squigg_db::{Database, models::UserRecord};
use squigg_types::models::User;

use crate::error::ServiceError;

const USER_NOT_FOUND: &str = "Could not find user.";

/// User lookup and sign-up over the document store.
pub struct IdentityService {
    db: Arc<Database>,
    hasher: KeyedHasher,
    /// Verified against when the username is unknown, so both failure
    /// paths do the same hashing work.
    decoy_hash: String,
}

impl IdentityService {
    pub fn new(db: Arc<Database>, hasher: KeyedHasher) -> Self {
        let decoy_hash = hasher.hash(&ids::generate());
        Self {
            db,
            hasher,
            decoy_hash,
        }
    }

    /// Wrong password and unknown username fail with the same error.
    pub fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        let record = self.db.get_user_by_username(username)?;

        let expected = record
            .as_ref()
            .map_or(self.decoy_hash.as_str(), |u| u.credential_hash.as_str());
        let verified = self.hasher.verify(password, expected);

        match record {
            Some(user) if verified => Ok(User { id: user.id }),
            _ => {
                debug!("Credential check failed");
                Err(ServiceError::NotFound(USER_NOT_FOUND.into()))
            }
        }
    }

    pub fn find_user_by_id(&self, id: &str) -> Result<User, ServiceError> {
        self.db
            .get_user_by_id(id)?
            .map(|u| User { id: u.id })
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.into()))
    }

    /// Returns only the new id; the username and hash stay in the store.
    pub fn create_user(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        if username.is_empty() || password.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Username and password are required.".into(),
            ));
        }

        let record = UserRecord {
            id: ids::generate(),
            username: username.to_string(),
            credential_hash: self.hasher.hash(password),
        };
        let id = record.id.clone();

        if !self.db.create_user(record)? {
            return Err(ServiceError::Conflict("Username is already taken.".into()));
        }

        info!("Created user {}", id);
        Ok(User { id })
    }
}
