use async_trait::async_trait;

use super::RecordStore;
use crate::clients::UserClient;
use crate::domain::{UserDraft, UserId, UserRecord};
use crate::user_actor::UserError;

#[async_trait]
impl RecordStore for UserClient {
    async fn list(&self) -> Result<Vec<UserRecord>, UserError> {
        self.list_users().await
    }

    async fn add(&self, draft: UserDraft) -> Result<UserRecord, UserError> {
        self.create_user(draft).await
    }

    async fn update(&self, id: &UserId, draft: UserDraft) -> Result<Option<UserRecord>, UserError> {
        self.update_user(id.clone(), draft).await
    }

    async fn remove(&self, id: &UserId) -> Result<bool, UserError> {
        Ok(self.delete_user(id.clone()).await? > 0)
    }
}
