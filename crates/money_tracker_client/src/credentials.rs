//! Where the bearer token comes from. The API client asks on every request,
//! so a token rotated in storage is picked up by the next call.

use crate::error::Result;
use crate::storage::{Storage, TOKEN_KEY};
use std::sync::Arc;

pub trait CredentialProvider: Send + Sync {
    /// `Ok(None)` means no session; the client refuses to send the request.
    fn token(&self) -> Result<Option<String>>;
}

/// Fixed token, e.g. from `MONEY_TRACKER_TOKEN` or a test.
pub struct StaticToken(pub String);

impl CredentialProvider for StaticToken {
    fn token(&self) -> Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

/// Reads the session token from client storage each time it is asked.
#[derive(Clone)]
pub struct StoredToken {
    storage: Arc<Storage>,
}

impl StoredToken {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl CredentialProvider for StoredToken {
    fn token(&self) -> Result<Option<String>> {
        self.storage.config_get(TOKEN_KEY)
    }
}
