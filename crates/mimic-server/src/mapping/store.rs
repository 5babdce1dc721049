//! MappingStore - the registry of stub mappings.
//!
//! The store is an append-only log. Readers take an O(1) snapshot of the current log and
//! iterate it without holding the lock; writers copy the log only while a snapshot of it is
//! still alive.

use super::types::{MappingDefinition, MappingSpec, RegistrationHandle};
use parking_lot::RwLock;
use std::sync::Arc;

struct StoreState {
    mappings: Arc<Vec<Arc<MappingSpec>>>,
    next_sequence: u64,
}

/// Concurrent registry of mappings, owned by a single server instance.
pub struct MappingStore {
    state: RwLock<StoreState>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                mappings: Arc::new(Vec::new()),
                next_sequence: 1,
            }),
        }
    }

    /// Register a mapping.
    ///
    /// The sequence number is assigned under the write lock, so sequence order and log order
    /// are the same. Any snapshot taken after this returns contains the new mapping.
    pub fn insert(&self, definition: MappingDefinition) -> RegistrationHandle {
        let mut state = self.state.write();
        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let spec = Arc::new(MappingSpec::register(definition, sequence));
        let handle = spec.handle();
        Arc::make_mut(&mut state.mappings).push(spec);
        handle
    }

    /// Consistent view of every mapping registered so far.
    pub fn all_mappings(&self) -> MappingSnapshot {
        MappingSnapshot {
            mappings: Arc::clone(&self.state.read().mappings),
        }
    }

    /// Remove every mapping. Sequence numbers keep increasing afterwards.
    pub fn reset(&self) -> usize {
        let mut state = self.state.write();
        let removed = state.mappings.len();
        state.mappings = Arc::new(Vec::new());
        removed
    }

    pub fn len(&self) -> usize {
        self.state.read().mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MappingStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable view of the store at one point in time.
///
/// Iteration is restartable: every call to [`iter`](Self::iter) starts from the first
/// registered mapping.
#[derive(Clone)]
pub struct MappingSnapshot {
    mappings: Arc<Vec<Arc<MappingSpec>>>,
}

impl MappingSnapshot {
    /// Mappings in registration order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<MappingSpec>> + '_ {
        self.mappings.iter()
    }

    /// Mappings with the most recently registered first.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &Arc<MappingSpec>> + '_ {
        self.mappings.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl std::fmt::Debug for MappingSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingSnapshot")
            .field("len", &self.mappings.len())
            .finish()
    }
}
