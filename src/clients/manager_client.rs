use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{UserId, UserRecord};
use crate::manager::{ManagerView, SubmitOutcome};
use crate::messages::ManagerRequest;
use crate::user_actor::UserError;

/// Handle onto the user manager. Every UI event goes through here.
#[derive(Clone)]
pub struct UserManagerClient {
    sender: mpsc::Sender<ManagerRequest>,
}

impl UserManagerClient {
    pub fn new(sender: mpsc::Sender<ManagerRequest>) -> Self {
        Self { sender }
    }

    /// No response needed: the manager stops after draining earlier requests.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), UserError> {
        debug!("Sending shutdown request");
        self.sender
            .send(ManagerRequest::Shutdown)
            .await
            .map_err(|e| UserError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(UserManagerClient => fn view() -> ManagerView as ManagerRequest::View, Error = UserError);
client_method!(UserManagerClient => fn set_name(name: String) -> () as ManagerRequest::SetName, Error = UserError);
client_method!(UserManagerClient => fn set_email(email: String) -> () as ManagerRequest::SetEmail, Error = UserError);
client_method!(UserManagerClient => fn begin_edit(record: UserRecord) -> () as ManagerRequest::BeginEdit, Error = UserError);
client_method!(UserManagerClient => fn cancel_edit() -> () as ManagerRequest::CancelEdit, Error = UserError);
client_method!(UserManagerClient => fn submit() -> SubmitOutcome as ManagerRequest::Submit, Error = UserError);
client_method!(UserManagerClient => fn delete(id: UserId) -> bool as ManagerRequest::Delete, Error = UserError);
client_method!(UserManagerClient => fn refresh() -> () as ManagerRequest::Refresh, Error = UserError);
