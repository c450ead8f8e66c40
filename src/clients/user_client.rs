use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{UserDraft, UserId, UserRecord};
use crate::user_actor::UserError;

/// Client for a user resource actor.
///
/// Serves as the local record store, and as the mirror the remote store
/// replaces after every fetch.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<UserRecord>,
}

impl_basic_client!(UserClient, UserRecord, UserId, UserError, user);

impl UserClient {
    /// Rejects incomplete drafts before anything is sent to the actor, as
    /// does [`UserClient::update_user`].
    #[instrument(skip(self))]
    pub async fn create_user(&self, draft: UserDraft) -> Result<UserRecord, UserError> {
        if let Some(field) = draft.missing_field() {
            debug!(field, "Skipping create with empty field");
            return Err(UserError::ValidationSkipped(field));
        }
        debug!("Sending request");
        self.inner.create(draft).await.map_err(UserError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<Option<UserRecord>, UserError> {
        if let Some(field) = draft.missing_field() {
            debug!(field, "Skipping update with empty field");
            return Err(UserError::ValidationSkipped(field));
        }
        debug!("Sending request");
        self.inner.update(id, draft).await.map_err(UserError::from)
    }

    #[instrument(skip(self, users), fields(user_count = users.len()))]
    pub async fn replace_users(&self, users: Vec<UserRecord>) -> Result<(), UserError> {
        debug!("Sending request");
        self.inner.replace(users).await.map_err(UserError::from)
    }
}
