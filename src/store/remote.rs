use async_trait::async_trait;
use tracing::debug;

use super::RecordStore;
use crate::domain::{UserDraft, UserId, UserRecord};
use crate::sync::SyncAdapter;
use crate::user_actor::UserError;

/// Record store mirrored from the remote users service.
///
/// Reads come from the mirror. Writes go through the [`SyncAdapter`], which
/// refreshes the mirror after each successful write.
#[derive(Clone)]
pub struct RemoteUserStore {
    adapter: SyncAdapter,
}

impl RemoteUserStore {
    pub fn new(adapter: SyncAdapter) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl RecordStore for RemoteUserStore {
    async fn list(&self) -> Result<Vec<UserRecord>, UserError> {
        self.adapter.mirror().list_users().await
    }

    async fn add(&self, draft: UserDraft) -> Result<UserRecord, UserError> {
        if let Some(field) = draft.missing_field() {
            debug!(field, "Skipping create with empty field");
            return Err(UserError::ValidationSkipped(field));
        }
        self.adapter.create(&draft).await
    }

    async fn update(&self, id: &UserId, draft: UserDraft) -> Result<Option<UserRecord>, UserError> {
        if let Some(field) = draft.missing_field() {
            debug!(field, "Skipping update with empty field");
            return Err(UserError::ValidationSkipped(field));
        }
        self.adapter.update(id, &draft).await
    }

    async fn remove(&self, id: &UserId) -> Result<bool, UserError> {
        self.adapter.delete(id).await.map(|()| true)
    }

    async fn load(&self) -> Result<(), UserError> {
        self.adapter.fetch_all().await.map(|_| ())
    }
}
