use crate::glcore;
use crate::glcore::{GLbitfield, GLenum, GLint, GLsizei, GLuint64};
use crate::{
    NglClientWaitFlags, NglClientWaitStatus, NglContext, NglError, NglResult, NglSignalHandle,
    NglSyncHandle, NglSyncStatus,
};

/// A fence sync object: a point in the GPU command stream that becomes
/// satisfied once all work submitted before its creation has completed.
///
/// The attached backend signal is the sole source of truth for satisfaction:
/// the fence is pending while `signal` is present and satisfied once it has
/// been cleared. Clearing happens the first time a wait or a non-blocking
/// poll observes the signal fired, and is never undone; a satisfied fence
/// stays satisfied.
pub struct NglSyncObject {
    name: u64,
    condition: GLenum,
    flags: GLbitfield,
    signal: Option<NglSignalHandle>,
}

impl NglSyncObject {
    pub fn name(&self) -> u64 {
        self.name
    }

    pub fn condition(&self) -> GLenum {
        self.condition
    }

    pub fn flags(&self) -> GLbitfield {
        self.flags
    }

    pub fn status(&self) -> NglSyncStatus {
        if self.signal.is_none() {
            NglSyncStatus::Signaled
        } else {
            NglSyncStatus::Unsignaled
        }
    }
}

impl NglContext {
    /// Create a fence sync object for the given condition.
    ///
    /// `condition` must be `SYNC_GPU_COMMANDS_COMPLETE` and `flags` must be
    /// zero. The backend attaches a completion signal covering all GPU work
    /// submitted up to this call.
    pub fn fence_sync(
        &mut self,
        condition: GLenum,
        flags: GLbitfield,
    ) -> NglResult<NglSyncHandle> {
        if condition != glcore::SYNC_GPU_COMMANDS_COMPLETE {
            return Err(NglError::InvalidEnum(format!(
                "fence_sync condition {:#06x} is not SYNC_GPU_COMMANDS_COMPLETE",
                condition
            )));
        }

        // must be zero
        if flags != 0 {
            return Err(NglError::InvalidValue(format!(
                "fence_sync flags must be zero, got {:#010x}",
                flags
            )));
        }

        let name = self.allocate_sync_name();
        let signal = self.backend.attach_signal()?;
        log::trace!("fence sync {} created at signal {}", name, signal.raw());

        self.syncs.insert(
            name,
            NglSyncObject {
                name,
                condition,
                flags,
                signal: Some(signal),
            },
        );

        Ok(NglSyncHandle::new(name))
    }

    /// Null-safe check that a handle names a sync object issued by this
    /// context.
    ///
    /// This is a structural check against the name allocator, not a liveness
    /// check; a handle whose object was already deleted still passes.
    pub fn is_sync(
        &self,
        sync: Option<NglSyncHandle>,
    ) -> bool {
        match sync {
            None => false,
            Some(sync) => self.is_allocated_name(sync),
        }
    }

    /// Delete a fence sync object, blocking until it is satisfied first if it
    /// is still pending. A pending fence is never released with its backend
    /// signal still attached.
    #[profiling::function]
    pub fn delete_sync(
        &mut self,
        sync: NglSyncHandle,
    ) -> NglResult<()> {
        let backend = self.backend.clone();

        if let Some(signal) = self.checked_sync_mut(sync)?.signal.take() {
            log::trace!("fence sync {} deleted while pending, waiting", sync.name());
            backend.await_signal(signal)?;
        }

        self.syncs.remove(&sync.name());
        Ok(())
    }

    /// Wait from the calling thread for a fence to be satisfied.
    ///
    /// Returns `AlreadySignaled` without blocking if the fence is satisfied
    /// (or the backend signal is observed fired) on entry; otherwise blocks
    /// until the backend signal fires and returns `ConditionSatisfied`.
    ///
    /// `flags` may contain at most `SYNC_FLUSH_COMMANDS_BIT`. A finite
    /// `timeout` is accepted but not honored as an early-return condition:
    /// the wait either returns immediately or runs to completion.
    #[profiling::function]
    pub fn client_wait_sync(
        &mut self,
        sync: NglSyncHandle,
        flags: GLbitfield,
        _timeout: GLuint64,
    ) -> NglResult<NglClientWaitStatus> {
        let flags = NglClientWaitFlags::from_bits(flags).ok_or_else(|| {
            NglError::InvalidValue(format!(
                "client_wait_sync flags {:#010x} contain bits other than SYNC_FLUSH_COMMANDS_BIT",
                flags
            ))
        })?;

        if flags.contains(NglClientWaitFlags::FLUSH_COMMANDS) {
            // Command submission is owned by the backend; everything covered
            // by this fence was already flushed when its signal was attached.
            log::trace!("client_wait_sync flush requested for sync {}", sync.name());
        }

        let backend = self.backend.clone();
        let object = self.checked_sync_mut(sync)?;

        let signal = match object.signal {
            None => return Ok(NglClientWaitStatus::AlreadySignaled),
            Some(signal) => signal,
        };

        if backend.poll_signal(signal)? {
            object.signal = None;
            return Ok(NglClientWaitStatus::AlreadySignaled);
        }

        backend.await_signal(signal)?;
        object.signal = None;

        Ok(NglClientWaitStatus::ConditionSatisfied)
    }

    /// Server-side-equivalent wait, issued from the calling thread before
    /// dependent submission.
    ///
    /// The only accepted `timeout` is `TIMEOUT_IGNORED`; the wait is always
    /// unbounded.
    #[profiling::function]
    pub fn wait_sync(
        &mut self,
        sync: NglSyncHandle,
        _flags: GLbitfield,
        timeout: GLuint64,
    ) -> NglResult<()> {
        if !self.is_allocated_name(sync) {
            return Err(NglError::InvalidValue(format!(
                "wait_sync handle {} was not issued by this context",
                sync.name()
            )));
        }

        if timeout != glcore::TIMEOUT_IGNORED {
            return Err(NglError::InvalidValue(format!(
                "wait_sync timeout must be TIMEOUT_IGNORED, got {}",
                timeout
            )));
        }

        let backend = self.backend.clone();
        let object = self.checked_sync_mut(sync)?;

        if let Some(signal) = object.signal.take() {
            backend.await_signal(signal)?;
        }

        Ok(())
    }

    /// Fill `count` slots of `values` with the requested sync object
    /// property.
    ///
    /// `pname` selects one of `OBJECT_TYPE`, `SYNC_STATUS`, `SYNC_CONDITION`,
    /// or `SYNC_FLAGS`. The status reported is non-blocking: the backend
    /// signal is polled, and a fired signal transitions the fence to
    /// satisfied before the value is read. `SYNC_CONDITION` slots are only
    /// written once the fence is satisfied. Nothing is written on any
    /// validation failure.
    pub fn get_sync_iv(
        &mut self,
        sync: NglSyncHandle,
        pname: GLenum,
        count: GLsizei,
        values: &mut [GLint],
    ) -> NglResult<()> {
        let backend = self.backend.clone();
        let object = self.checked_sync_mut(sync)?;

        if count <= 0 {
            return Err(NglError::InvalidValue(format!(
                "get_sync_iv count must be positive, got {}",
                count
            )));
        }

        if values.len() < count as usize {
            return Err(NglError::InvalidValue(format!(
                "get_sync_iv output holds {} values, {} requested",
                values.len(),
                count
            )));
        }

        // A fired signal satisfies the fence even if nothing ever waited on
        // it; observe that here without blocking.
        if let Some(signal) = object.signal {
            if backend.poll_signal(signal)? {
                object.signal = None;
            }
        }

        let signaled = object.signal.is_none();
        let out = &mut values[0..count as usize];

        match pname {
            glcore::OBJECT_TYPE => out.fill(glcore::SYNC_FENCE as GLint),
            glcore::SYNC_STATUS => out.fill(object.status().gl_value() as GLint),
            glcore::SYNC_CONDITION => {
                // Only meaningful once satisfied; pending fences leave the
                // output untouched.
                if signaled {
                    out.fill(object.condition as GLint);
                }
            }
            glcore::SYNC_FLAGS => out.fill(object.flags as GLint),
            _ => {
                return Err(NglError::InvalidEnum(format!(
                    "get_sync_iv pname {:#06x} is not a sync object property",
                    pname
                )));
            }
        }

        Ok(())
    }

    /// Block until every live pending fence in this context is satisfied.
    #[profiling::function]
    pub fn wait_idle(&mut self) -> NglResult<()> {
        let backend = self.backend.clone();
        let pending = self
            .syncs
            .values()
            .filter(|sync| sync.signal.is_some())
            .count();
        if pending > 0 {
            log::debug!("wait_idle: {} pending fence(s)", pending);
        }

        for object in self.syncs.values_mut() {
            if let Some(signal) = object.signal.take() {
                backend.await_signal(signal)?;
            }
        }

        Ok(())
    }

    // Resolve a handle to its live object: structural check against the
    // allocator first, then the sync table. A structurally valid name whose
    // object is gone was deleted earlier by the caller.
    fn checked_sync_mut(
        &mut self,
        sync: NglSyncHandle,
    ) -> NglResult<&mut NglSyncObject> {
        if !self.is_allocated_name(sync) {
            return Err(NglError::InvalidValue(format!(
                "sync handle {} was not issued by this context",
                sync.name()
            )));
        }

        self.syncs.get_mut(&sync.name()).ok_or_else(|| {
            NglError::InvalidOperation(format!(
                "sync handle {} refers to a deleted object",
                sync.name()
            ))
        })
    }
}
