use crate::actor_framework::Entity;
use crate::domain::{UserDraft, UserId, UserRecord};

impl Entity for UserRecord {
    type Id = UserId;
    type CreatePayload = UserDraft;
    type Patch = UserDraft;

    fn id(&self) -> &UserId { &self.id }

    /// Builds a record from a draft, refusing drafts with an empty field.
    fn from_create(id: UserId, draft: UserDraft) -> Result<Self, String> {
        if let Some(field) = draft.missing_field() {
            return Err(format!("{field} is required"));
        }
        Ok(Self {
            id,
            name: draft.name,
            email: draft.email,
        })
    }

    /// Replaces name and email. The id is never touched.
    fn on_update(&mut self, draft: UserDraft) -> Result<(), String> {
        if let Some(field) = draft.missing_field() {
            return Err(format!("{field} is required"));
        }
        self.name = draft.name;
        self.email = draft.email;
        Ok(())
    }
}
