use std::fmt::{Debug, Display};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait with lifecycle hooks)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: Clone + Send + Sync + Debug;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and Payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> { Ok(()) }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> { Ok(()) }
}

/// Errors reported by a resource actor or by the channel in front of it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped the response")]
    ActorDropped,
}

/// Produces the id of the next created entity from the current contents.
pub type IdGenerator<T> = Box<dyn FnMut(&[T]) -> <T as Entity>::Id + Send>;

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    List {
        respond_to: Response<Vec<T>>,
    },
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<Option<T>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<usize>,
    },
    Replace {
        items: Vec<T>,
        respond_to: Response<()>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Owns an ordered collection of entities and serves requests one at a time.
///
/// Items keep insertion order. Ids are not required to be unique: update and
/// delete act on every item carrying the requested id.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: Vec<T>,
    next_id: Option<IdGenerator<T>>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        items: Vec<T>,
        next_id: impl FnMut(&[T]) -> T::Id + Send + 'static,
    ) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, items, Some(Box::new(next_id)))
    }

    /// An actor that mirrors an upstream collection. It never mints ids, so
    /// its contents only change through `Replace`, `Update` and `Delete`.
    pub fn mirror(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, Vec::new(), None)
    }

    fn build(
        buffer_size: usize,
        items: Vec<T>,
        next_id: Option<IdGenerator<T>>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: items,
            next_id,
        };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", skip(self))]
    pub async fn run(mut self) {
        debug!(item_count = self.store.len(), "ResourceActor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.clone()));
                }
                ResourceRequest::Create { payload, respond_to } => {
                    let _ = respond_to.send(self.handle_create(payload));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Replace { items, respond_to } => {
                    debug!(item_count = items.len(), "Replacing contents");
                    self.store = items;
                    let _ = respond_to.send(Ok(()));
                }
            }
        }
        debug!("ResourceActor stopped");
    }

    fn handle_create(&mut self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        let next_id = self.next_id.as_mut().ok_or_else(|| {
            FrameworkError::Rejected("items are created upstream".to_string())
        })?;
        let id = next_id(&self.store);
        let mut item = T::from_create(id, payload).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;
        if self.store.iter().any(|existing| existing.id() == item.id()) {
            warn!(id = %item.id(), "Created item shares its id with an existing item");
        }
        self.store.push(item.clone());
        info!(id = %item.id(), "Item created");
        Ok(item)
    }

    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<Option<T>, FrameworkError> {
        let mut first = None;
        for item in self.store.iter_mut().filter(|item| item.id() == &id) {
            item.on_update(patch.clone()).map_err(FrameworkError::Rejected)?;
            if first.is_none() {
                first = Some(item.clone());
            }
        }
        match &first {
            Some(_) => info!(id = %id, "Item updated"),
            None => debug!(id = %id, "No item to update"),
        }
        Ok(first)
    }

    fn handle_delete(&mut self, id: T::Id) -> Result<usize, FrameworkError> {
        for item in self.store.iter().filter(|item| item.id() == &id) {
            item.on_delete().map_err(FrameworkError::Rejected)?;
        }
        let before = self.store.len();
        self.store.retain(|item| item.id() != &id);
        let removed = before - self.store.len();
        debug!(id = %id, removed, "Delete processed");
        Ok(removed)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { payload, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn replace(&self, items: Vec<T>) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Replace { items, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
