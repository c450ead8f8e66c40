//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then helpers
//! like [`expect_create`] or [`expect_replace`] to assert what the client
//! sent and answer it. [`FakeUserApi`] stands in for the remote users
//! service.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::domain::{UserDraft, UserId, UserRecord};
use crate::sync::UserApi;
use crate::user_actor::UserError;

type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test controls, so the test can inspect
/// each request and answer it with success, failure, or not at all.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::CreatePayload, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<Responder<Vec<T>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a Replace request
pub async fn expect_replace<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(Vec<T>, Responder<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Replace { items, respond_to }) => Some((items, respond_to)),
        _ => None,
    }
}

/// A call received by [`FakeUserApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Fetch,
    Create(UserDraft),
    Update(UserId, UserDraft),
    Delete(UserId),
}

#[derive(Default)]
struct FakeState {
    users: Vec<UserRecord>,
    minted: u64,
    calls: Vec<ApiCall>,
    fail_writes: bool,
    fail_fetches: bool,
}

/// In-memory users service that records every call and can be told to fail.
#[derive(Default)]
pub struct FakeUserApi {
    state: Mutex<FakeState>,
}

impl FakeUserApi {
    pub fn with_users(users: Vec<UserRecord>) -> Arc<Self> {
        let api = Self::default();
        api.state.lock().unwrap().users = users;
        Arc::new(api)
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.state.lock().unwrap().users.clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.state.lock().unwrap().fail_fetches = fail;
    }
}

fn unavailable() -> UserError {
    UserError::NetworkFailure("connection refused".to_string())
}

#[async_trait]
impl UserApi for FakeUserApi {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, UserError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Fetch);
        if state.fail_fetches {
            return Err(unavailable());
        }
        Ok(state.users.clone())
    }

    async fn create_user(&self, draft: &UserDraft) -> Result<Option<UserRecord>, UserError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Create(draft.clone()));
        if state.fail_writes {
            return Err(unavailable());
        }
        state.minted += 1;
        let record = UserRecord::new(format!("srv-{}", state.minted), draft.name.clone(), draft.email.clone());
        state.users.push(record.clone());
        Ok(Some(record))
    }

    async fn update_user(&self, id: &UserId, draft: &UserDraft) -> Result<Option<UserRecord>, UserError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Update(id.clone(), draft.clone()));
        if state.fail_writes {
            return Err(unavailable());
        }
        let record = state
            .users
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| UserError::NetworkFailure("404 Not Found".to_string()))?;
        record.name = draft.name.clone();
        record.email = draft.email.clone();
        Ok(Some(record.clone()))
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Delete(id.clone()));
        if state.fail_writes {
            return Err(unavailable());
        }
        state.users.retain(|record| &record.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::UserClient;

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<UserRecord>(10);
        let client = UserClient::new(inner);

        let create_task = tokio::spawn(async move {
            client.create_user(UserDraft::new("Test", "test@example.com")).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Test");
        let record = UserRecord::new(1, payload.name, payload.email);
        responder.send(Ok(record.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(record));
    }
}
