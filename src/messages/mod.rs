use tokio::sync::oneshot;

use crate::domain::{UserId, UserRecord};
use crate::manager::{ManagerView, SubmitOutcome};
use crate::user_actor::UserError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// UI events delivered to the user manager. Each variant includes its
/// parameters and a oneshot channel for the response.
#[derive(Debug)]
pub enum ManagerRequest {
    View {
        respond_to: ServiceResponse<ManagerView, UserError>,
    },
    SetName {
        name: String,
        respond_to: ServiceResponse<(), UserError>,
    },
    SetEmail {
        email: String,
        respond_to: ServiceResponse<(), UserError>,
    },
    BeginEdit {
        record: UserRecord,
        respond_to: ServiceResponse<(), UserError>,
    },
    CancelEdit {
        respond_to: ServiceResponse<(), UserError>,
    },
    Submit {
        respond_to: ServiceResponse<SubmitOutcome, UserError>,
    },
    Delete {
        id: UserId,
        respond_to: ServiceResponse<bool, UserError>,
    },
    Refresh {
        respond_to: ServiceResponse<(), UserError>,
    },
    Shutdown,
}
