use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, instrument};

use super::UserApi;
use crate::clients::UserClient;
use crate::domain::{UserDraft, UserId, UserRecord};
use crate::user_actor::UserError;

/// Translates store operations into remote calls and keeps a local mirror of
/// the remote collection.
///
/// Every write follows the same policy: perform the write; if it fails,
/// report it and leave the mirror alone; if it succeeds, fetch the whole
/// collection and replace the mirror with it. Between a write's response and
/// the end of that fetch the mirror still shows the pre-write list. Nothing
/// is retried and nothing is applied optimistically.
#[derive(Clone)]
pub struct SyncAdapter {
    api: Arc<dyn UserApi>,
    mirror: UserClient,
}

impl SyncAdapter {
    pub fn new(api: Arc<dyn UserApi>, mirror: UserClient) -> Self {
        Self { api, mirror }
    }

    pub fn mirror(&self) -> &UserClient {
        &self.mirror
    }

    /// Replaces the mirror with the remote collection. On failure the
    /// mirror keeps its previous contents.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<UserRecord>, UserError> {
        let users = match self.api.fetch_users().await {
            Ok(users) => users,
            Err(e) => {
                error!(error = %e, "Fetching users failed, keeping previous list");
                return Err(e);
            }
        };
        info!(user_count = users.len(), "Fetched users");
        self.mirror.replace_users(users.clone()).await?;
        Ok(users)
    }

    /// The created record is the one the service echoed back, or else the
    /// newest listed record with the draft's fields.
    #[instrument(skip(self))]
    pub async fn create(&self, draft: &UserDraft) -> Result<UserRecord, UserError> {
        let (stored, users) = self.write_then_reconcile("create", self.api.create_user(draft)).await?;
        stored
            .or_else(|| {
                users
                    .into_iter()
                    .rev()
                    .find(|user| user.name == draft.name && user.email == draft.email)
            })
            .ok_or_else(|| UserError::Rejected("created user is missing from the service's list".to_string()))
    }

    /// `None` when the service neither echoed the record nor lists it.
    #[instrument(skip(self))]
    pub async fn update(&self, id: &UserId, draft: &UserDraft) -> Result<Option<UserRecord>, UserError> {
        let (stored, users) = self.write_then_reconcile("update", self.api.update_user(id, draft)).await?;
        Ok(stored.or_else(|| users.into_iter().find(|user| &user.id == id)))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.write_then_reconcile("delete", self.api.delete_user(id)).await.map(|((), _)| ())
    }

    /// Returns the write's result along with the freshly fetched list.
    async fn write_then_reconcile<R>(
        &self,
        operation: &'static str,
        write: impl Future<Output = Result<R, UserError>> + Send,
    ) -> Result<(R, Vec<UserRecord>), UserError> {
        let written = match write.await {
            Ok(written) => written,
            Err(e) => {
                error!(error = %e, operation, "Remote write failed");
                return Err(e);
            }
        };
        info!(operation, "Remote write succeeded, reconciling");
        let users = self.fetch_all().await?;
        Ok((written, users))
    }
}
