use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fnv::FnvHashMap;

use crate::{NglSyncBackend, NglSyncHandle, NglSyncObject};

/// Per-context state of the sync layer.
///
/// A context owns its object-name counter and its table of live fence sync
/// objects, and holds the backend it was constructed with. Contexts are
/// independent of each other; a handle is only meaningful to the context that
/// created it. All operations take `&mut self`: a context is driven by a
/// single calling thread, and the backend's blocking wait is the only
/// suspension point.
pub struct NglContext {
    pub(crate) backend: Arc<dyn NglSyncBackend>,
    pub(crate) syncs: FnvHashMap<u64, NglSyncObject>,
    next_sync_name: AtomicU64,
}

impl std::fmt::Debug for NglContext {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("NglContext")
            .field("live_syncs", &self.syncs.len())
            .field("next_sync_name", &self.next_sync_name)
            .finish()
    }
}

impl NglContext {
    pub fn new(backend: Arc<dyn NglSyncBackend>) -> Self {
        log::debug!("Initializing NGL sync layer");

        NglContext {
            backend,
            syncs: FnvHashMap::default(),
            next_sync_name: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &Arc<dyn NglSyncBackend> {
        &self.backend
    }

    /// Number of sync objects currently alive in this context.
    pub fn live_sync_count(&self) -> usize {
        self.syncs.len()
    }

    // Returns the current counter value, then advances it. Names are never
    // reused for the lifetime of the context; deletion does not decrement.
    pub(crate) fn allocate_sync_name(&self) -> u64 {
        self.next_sync_name.fetch_add(1, Ordering::Relaxed)
    }

    // Structural validity: the name was issued by this context's allocator.
    // This cannot tell a live object from a deleted one; operations that
    // dereference the handle resolve it through the sync table afterward.
    pub(crate) fn is_allocated_name(
        &self,
        sync: NglSyncHandle,
    ) -> bool {
        sync.name() < self.next_sync_name.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::NglSoftwareBackend;

    #[test]
    fn names_strictly_increase() {
        let context = NglContext::new(Arc::new(NglSoftwareBackend::new()));

        let a = context.allocate_sync_name();
        let b = context.allocate_sync_name();
        let c = context.allocate_sync_name();
        assert!(a < b && b < c);
    }

    #[test]
    fn allocated_name_check_is_structural() {
        let context = NglContext::new(Arc::new(NglSoftwareBackend::new()));
        assert!(!context.is_allocated_name(NglSyncHandle::new(0)));

        let name = context.allocate_sync_name();
        assert!(context.is_allocated_name(NglSyncHandle::new(name)));
        assert!(!context.is_allocated_name(NglSyncHandle::new(name + 1)));
    }
}
