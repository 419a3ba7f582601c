use crate::glcore;
use crate::glcore::GLenum;

/// Opaque handle to a fence sync object.
///
/// Handles are minted by [`fence_sync`](crate::NglContext::fence_sync) and are
/// only meaningful to the context that created them. GL's null sync handle is
/// modeled as `Option<NglSyncHandle>` where an operation is null-safe.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NglSyncHandle(u64);

impl NglSyncHandle {
    pub(crate) fn new(name: u64) -> Self {
        NglSyncHandle(name)
    }

    /// The context-unique object name behind this handle.
    pub fn name(self) -> u64 {
        self.0
    }
}

/// Opaque completion signal minted by a sync backend.
///
/// The value stands for a point in the backend's completion timeline and is
/// interpreted only by the backend that minted it. The sync layer stores it,
/// hands it back to the backend for polls and waits, and drops it once
/// completion has been observed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NglSignalHandle(u64);

impl NglSignalHandle {
    pub fn new(raw: u64) -> Self {
        NglSignalHandle(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Indicates the current state of a fence sync object.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum NglSyncStatus {
    /// Completion has been observed; the fence will never become unsignaled
    /// again
    Signaled,
    /// The backend signal is still attached; GPU work submitted before the
    /// fence was created may still be in flight
    Unsignaled,
}

impl NglSyncStatus {
    pub fn gl_value(self) -> GLenum {
        match self {
            NglSyncStatus::Signaled => glcore::SIGNALED,
            NglSyncStatus::Unsignaled => glcore::UNSIGNALED,
        }
    }
}

/// Result of a client-side wait on a fence sync object.
///
/// There is no timeout outcome: a client wait either observes the fence
/// already satisfied and returns immediately, or blocks until the backend
/// signal fires.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum NglClientWaitStatus {
    /// The fence was satisfied before the wait had to block
    AlreadySignaled,
    /// The wait blocked and the condition was satisfied while waiting
    ConditionSatisfied,
}

impl NglClientWaitStatus {
    pub fn gl_value(self) -> GLenum {
        match self {
            NglClientWaitStatus::AlreadySignaled => glcore::ALREADY_SIGNALED,
            NglClientWaitStatus::ConditionSatisfied => glcore::CONDITION_SATISFIED,
        }
    }
}

bitflags::bitflags! {
    /// Flags accepted by a client-side fence wait. Anything outside this set
    /// is rejected as an invalid value.
    pub struct NglClientWaitFlags : u32 {
        const FLUSH_COMMANDS = glcore::SYNC_FLUSH_COMMANDS_BIT;
    }
}

bitflags::bitflags! {
    /// The memory barrier scopes a full-pipeline barrier may name.
    ///
    /// `BY_REGION` is the subset that the by-region barrier flavor accepts;
    /// framebuffer-region operations cannot order scopes outside it.
    pub struct NglMemoryBarrierMask : u32 {
        const VERTEX_ATTRIB_ARRAY = glcore::VERTEX_ATTRIB_ARRAY_BARRIER_BIT;
        const ELEMENT_ARRAY = glcore::ELEMENT_ARRAY_BARRIER_BIT;
        const UNIFORM = glcore::UNIFORM_BARRIER_BIT;
        const TEXTURE_FETCH = glcore::TEXTURE_FETCH_BARRIER_BIT;
        const SHADER_IMAGE_ACCESS = glcore::SHADER_IMAGE_ACCESS_BARRIER_BIT;
        const COMMAND = glcore::COMMAND_BARRIER_BIT;
        const PIXEL_BUFFER = glcore::PIXEL_BUFFER_BARRIER_BIT;
        const TEXTURE_UPDATE = glcore::TEXTURE_UPDATE_BARRIER_BIT;
        const BUFFER_UPDATE = glcore::BUFFER_UPDATE_BARRIER_BIT;
        const FRAMEBUFFER = glcore::FRAMEBUFFER_BARRIER_BIT;
        const TRANSFORM_FEEDBACK = glcore::TRANSFORM_FEEDBACK_BARRIER_BIT;
        const ATOMIC_COUNTER = glcore::ATOMIC_COUNTER_BARRIER_BIT;
        const SHADER_STORAGE = glcore::SHADER_STORAGE_BARRIER_BIT;

        const BY_REGION = Self::ATOMIC_COUNTER.bits
            | Self::FRAMEBUFFER.bits
            | Self::SHADER_IMAGE_ACCESS.bits
            | Self::SHADER_STORAGE.bits
            | Self::TEXTURE_FETCH.bits
            | Self::UNIFORM.bits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_region_is_subset_of_full_mask() {
        assert_eq!(
            NglMemoryBarrierMask::BY_REGION & NglMemoryBarrierMask::all(),
            NglMemoryBarrierMask::BY_REGION
        );
    }

    #[test]
    fn wait_status_gl_values() {
        assert_eq!(
            NglClientWaitStatus::AlreadySignaled.gl_value(),
            glcore::ALREADY_SIGNALED
        );
        assert_eq!(
            NglClientWaitStatus::ConditionSatisfied.gl_value(),
            glcore::CONDITION_SATISFIED
        );
        assert_eq!(NglSyncStatus::Signaled.gl_value(), glcore::SIGNALED);
        assert_eq!(NglSyncStatus::Unsignaled.gl_value(), glcore::UNSIGNALED);
    }
}
