use std::fmt::{Debug, Display};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::repository::{Repository, RepositoryError};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks and Id Sequences)
// =============================================================================

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Repository failure: {0}")]
    Repository(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

impl From<RepositoryError> for FrameworkError {
    fn from(err: RepositoryError) -> Self {
        FrameworkError::Repository(err.to_string())
    }
}

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    /// Short name used in logs and error messages.
    const KIND: &'static str;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and creation parameters
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, FrameworkError>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), FrameworkError> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), FrameworkError>;
    fn on_delete(&self) -> Result<(), FrameworkError> {
        Ok(())
    }
}

/// Assigns the identifier of a record about to be created.
///
/// The sequence sees the collection as loaded for that create, so it is only as
/// consistent as the repository read it is handed.
pub trait IdSequence<T: Entity>: Send + Sync + 'static {
    fn next_id(&self, existing: &[T]) -> T::Id;
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Owns a repository-backed collection and applies requests one at a time.
///
/// Every request reads the whole collection from the repository; mutations write
/// the whole new collection back. Processing requests from a single mailbox is
/// what keeps the read-then-write steps of one process from interleaving.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    repository: Arc<dyn Repository<T>>,
    sequence: Box<dyn IdSequence<T>>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        repository: Arc<dyn Repository<T>>,
        sequence: impl IdSequence<T>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            repository,
            sequence: Box::new(sequence),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    #[instrument(name = "resource_actor", skip(self), fields(entity = T::KIND))]
    pub async fn run(mut self) {
        info!("ResourceActor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(self.handle_get(&id));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(self.handle_list());
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(&id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(&id));
                }
            }
        }

        info!("ResourceActor stopped");
    }

    #[instrument(skip(self, params))]
    fn handle_create(&self, params: T::CreateParams) -> Result<T, FrameworkError> {
        let mut items = self.repository.load()?;
        let id = self.sequence.next_id(&items);

        let mut item = T::from_create_params(id.clone(), params)?;
        item.on_create()?;
        items.push(item.clone());
        self.repository.save(&items)?;

        info!(id = %id, "Item created");
        Ok(item)
    }

    #[instrument(skip(self))]
    fn handle_get(&self, id: &T::Id) -> Result<Option<T>, FrameworkError> {
        let item = self.repository.load()?.into_iter().find(|item| item.id() == id);
        if item.is_none() {
            debug!("Item not found");
        }
        Ok(item)
    }

    #[instrument(skip(self))]
    fn handle_list(&self) -> Result<Vec<T>, FrameworkError> {
        let items = self.repository.load()?;
        debug!(count = items.len(), "Listing items");
        Ok(items)
    }

    #[instrument(skip(self, patch))]
    fn handle_update(&self, id: &T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        let mut items = self.repository.load()?;
        let Some(item) = items.iter_mut().find(|item| item.id() == id) else {
            warn!("Update target not found");
            return Err(FrameworkError::NotFound(id.to_string()));
        };

        item.on_update(patch)?;
        let updated = item.clone();
        self.repository.save(&items)?;

        info!("Item updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    fn handle_delete(&self, id: &T::Id) -> Result<(), FrameworkError> {
        let mut items = self.repository.load()?;
        let Some(index) = items.iter().position(|item| item.id() == id) else {
            warn!("Delete target not found");
            return Err(FrameworkError::NotFound(id.to_string()));
        };

        items[index].on_delete()?;
        items.remove(index);
        self.repository.save(&items)?;

        info!("Item deleted");
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Manual impl: a derive would require `T: Clone` on the request type too.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
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

    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.call(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
