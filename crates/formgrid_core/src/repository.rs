//! The persistence contract and its capability gate.
//!
//! The core does not define a wire format or SQL dialect; it calls the
//! four-method [`Repository`] contract and nothing else. Whether the caller
//! may mutate data at all is a single boolean capability supplied by the
//! surrounding session layer.

use crate::entity::Entity;
use crate::error::{RepositoryError, StorageError};
use crate::types::EntityId;
use parking_lot::RwLock;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// Persistence operations for one entity type.
///
/// One store per entity type, keyed by the identity field; attribute names
/// correspond 1:1 to the descriptor's field names. Calls are blocking and
/// run to completion; the core imposes no timeout or retry.
pub trait Repository<T: Entity> {
    /// Returns every stored instance.
    ///
    /// Either the full set or an error; never a silent partial result.
    fn list_all(&self) -> Result<Vec<T>, StorageError>;

    /// Stores a new instance.
    ///
    /// The backend assigns the identity if the instance carries none; the
    /// returned instance carries the authoritative identity value.
    fn create(&mut self, instance: T) -> Result<T, StorageError>;

    /// Updates the row addressed by the instance's identity.
    ///
    /// Returns `false` (not an error) if no such row exists.
    fn update(&mut self, instance: &T) -> Result<bool, StorageError>;

    /// Deletes the row with the given identity.
    ///
    /// Idempotent: returns `false` if the identity was already absent.
    fn delete(&mut self, id: EntityId) -> Result<bool, StorageError>;
}

/// The "can the current actor mutate data" capability.
///
/// A cloneable handle; the external session/authentication collaborator
/// keeps one clone and flips it on login/logout, the repository gate reads
/// it per operation.
#[derive(Debug, Clone)]
pub struct EditCapability {
    granted: Arc<RwLock<bool>>,
}

impl EditCapability {
    /// Creates a capability with the given initial state.
    #[must_use]
    pub fn new(granted: bool) -> Self {
        Self {
            granted: Arc::new(RwLock::new(granted)),
        }
    }

    /// Creates a granted capability.
    #[must_use]
    pub fn granted() -> Self {
        Self::new(true)
    }

    /// Creates a denied capability.
    #[must_use]
    pub fn denied() -> Self {
        Self::new(false)
    }

    /// Grants the capability.
    pub fn grant(&self) {
        *self.granted.write() = true;
    }

    /// Revokes the capability.
    pub fn revoke(&self) {
        *self.granted.write() = false;
    }

    /// Returns the current state.
    #[must_use]
    pub fn can_mutate(&self) -> bool {
        *self.granted.read()
    }
}

/// A capability-gated repository.
///
/// Wraps any [`Repository`] and refuses `create`/`update`/`delete` with
/// [`RepositoryError::PermissionDenied`] while the capability is revoked.
/// `list_all` is always permitted.
pub struct GatedRepository<T: Entity, R: Repository<T>> {
    inner: R,
    capability: EditCapability,
    _marker: PhantomData<T>,
}

impl<T: Entity, R: Repository<T>> GatedRepository<T, R> {
    /// Wraps a repository with a capability.
    pub fn new(inner: R, capability: EditCapability) -> Self {
        Self {
            inner,
            capability,
            _marker: PhantomData,
        }
    }

    /// Returns the capability handle.
    #[must_use]
    pub fn capability(&self) -> &EditCapability {
        &self.capability
    }

    /// Returns every stored instance. Always permitted.
    pub fn list_all(&self) -> Result<Vec<T>, RepositoryError> {
        Ok(self.inner.list_all()?)
    }

    /// Stores a new instance, if the capability is granted.
    pub fn create(&mut self, instance: T) -> Result<T, RepositoryError> {
        self.check()?;
        let created = self.inner.create(instance)?;
        debug!(id = ?created.identity(), "created entity");
        Ok(created)
    }

    /// Updates an instance by identity, if the capability is granted.
    pub fn update(&mut self, instance: &T) -> Result<bool, RepositoryError> {
        self.check()?;
        let found = self.inner.update(instance)?;
        debug!(id = ?instance.identity(), found, "updated entity");
        Ok(found)
    }

    /// Deletes by identity, if the capability is granted.
    pub fn delete(&mut self, id: EntityId) -> Result<bool, RepositoryError> {
        self.check()?;
        let found = self.inner.delete(id)?;
        debug!(%id, found, "deleted entity");
        Ok(found)
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.capability.can_mutate() {
            Ok(())
        } else {
            warn!("mutation refused: edit capability not granted");
            Err(RepositoryError::PermissionDenied)
        }
    }
}
