//! The user manager: owns the form and a record store, and handles UI
//! events one at a time.
//!
//! The actor is mounted when [`UserManagerService::run`] starts (it loads the
//! store once), active while its channel is open, and unmounted when every
//! client is gone or a shutdown request arrives. Each request, including any
//! network round trip it causes, completes before the next one is read.

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::UserManagerClient;
use crate::domain::{UserDraft, UserId, UserRecord};
use crate::form::{FormController, FormMode, Submission};
use crate::messages::{ManagerRequest, ServiceResponse};
use crate::store::RecordStore;
use crate::user_actor::UserError;

/// Everything the presentation layer needs to draw the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerView {
    pub users: Vec<UserRecord>,
    pub mode: FormMode,
    pub draft: UserDraft,
    pub heading: &'static str,
    pub submit_label: &'static str,
    /// Last failure, shown without blocking further input. Cleared by the
    /// next successful submit, delete or refresh.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(UserRecord),
    /// `None` when the edited record no longer exists.
    Updated(Option<UserRecord>),
    /// A field was empty; nothing changed.
    Skipped,
}

pub struct UserManagerService {
    receiver: mpsc::Receiver<ManagerRequest>,
    store: Box<dyn RecordStore>,
    form: FormController,
    notice: Option<String>,
}

impl UserManagerService {
    pub fn new(buffer_size: usize, store: Box<dyn RecordStore>) -> (Self, UserManagerClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            store,
            form: FormController::new(),
            notice: None,
        };
        (service, UserManagerClient::new(sender))
    }

    #[instrument(name = "user_manager", skip(self))]
    pub async fn run(mut self) {
        info!("UserManager mounted");
        let loaded = self.store.load().await;
        let _ = self.settle("load users", loaded);

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ManagerRequest::View { respond_to } => {
                    let _ = respond_to.send(self.handle_view().await);
                }
                ManagerRequest::SetName { name, respond_to } => {
                    self.form.set_name(name);
                    let _ = respond_to.send(Ok(()));
                }
                ManagerRequest::SetEmail { email, respond_to } => {
                    self.form.set_email(email);
                    let _ = respond_to.send(Ok(()));
                }
                ManagerRequest::BeginEdit { record, respond_to } => {
                    self.handle_begin_edit(record, respond_to);
                }
                ManagerRequest::CancelEdit { respond_to } => {
                    debug!("Edit cancelled");
                    self.form.clear();
                    let _ = respond_to.send(Ok(()));
                }
                ManagerRequest::Submit { respond_to } => {
                    let result = self.handle_submit().await;
                    let _ = respond_to.send(self.settle("save user", result));
                }
                ManagerRequest::Delete { id, respond_to } => {
                    let result = self.handle_delete(id).await;
                    let _ = respond_to.send(self.settle("delete user", result));
                }
                ManagerRequest::Refresh { respond_to } => {
                    let result = self.store.load().await;
                    let _ = respond_to.send(self.settle("load users", result));
                }
                ManagerRequest::Shutdown => {
                    info!("UserManager shutting down");
                    break;
                }
            }
        }

        info!("UserManager unmounted");
    }

    /// Records the outcome of a store operation as the current notice.
    fn settle<T>(&mut self, action: &str, result: Result<T, UserError>) -> Result<T, UserError> {
        match &result {
            Ok(_) => self.notice = None,
            Err(e) => {
                error!(error = %e, action, "Operation failed");
                self.notice = Some(format!("Could not {action}: {e}"));
            }
        }
        result
    }

    async fn handle_view(&self) -> Result<ManagerView, UserError> {
        Ok(ManagerView {
            users: self.store.list().await?,
            mode: self.form.mode().clone(),
            draft: self.form.draft().clone(),
            heading: self.form.heading(),
            submit_label: self.form.submit_label(),
            notice: self.notice.clone(),
        })
    }

    #[instrument(fields(user_id = %record.id, user_name = %record.name), skip(self, record, respond_to))]
    fn handle_begin_edit(&mut self, record: UserRecord, respond_to: ServiceResponse<(), UserError>) {
        debug!("Processing begin_edit request");
        self.form.begin_edit(&record);
        let _ = respond_to.send(Ok(()));
    }

    /// Leaves the form untouched when the store call fails, so the same
    /// submit can be retried.
    #[instrument(skip(self))]
    async fn handle_submit(&mut self) -> Result<SubmitOutcome, UserError> {
        let Some(submission) = self.form.submission() else {
            debug!("Submit ignored: empty field");
            return Ok(SubmitOutcome::Skipped);
        };

        let outcome = match submission {
            Submission::Create(draft) => {
                let record = self.store.add(draft).await?;
                info!(user_id = %record.id, "User created");
                SubmitOutcome::Created(record)
            }
            Submission::Update(id, draft) => {
                let record = self.store.update(&id, draft).await?;
                match &record {
                    Some(_) => info!(user_id = %id, "User updated"),
                    None => warn!(user_id = %id, "Edited user no longer exists"),
                }
                SubmitOutcome::Updated(record)
            }
        };

        self.form.clear();
        Ok(outcome)
    }

    /// Does not reset the form, even when the deleted record is the one
    /// being edited.
    #[instrument(fields(user_id = %id), skip(self, id))]
    async fn handle_delete(&mut self, id: UserId) -> Result<bool, UserError> {
        debug!("Processing delete request");
        let removed = self.store.remove(&id).await?;
        if self.form.editing_id() == Some(&id) {
            warn!("Deleted the user being edited; draft still targets it");
        }
        if removed {
            info!("User deleted");
        } else {
            debug!("No user to delete");
        }
        Ok(removed)
    }
}
