use crate::glcore::GLbitfield;
use crate::{NglContext, NglError, NglMemoryBarrierMask, NglResult};

impl NglContext {
    /// Order GPU-visible memory effects across the named scopes, pipeline
    /// wide.
    ///
    /// The mask is validated against the full-pipeline legal bit set; any
    /// foreign bit is a recoverable invalid-value error and no barrier is
    /// recorded. Ordering enforcement itself is owned by the backend's
    /// command translation, not this layer.
    pub fn memory_barrier(
        &mut self,
        barriers: GLbitfield,
    ) -> NglResult<()> {
        let mask = NglMemoryBarrierMask::from_bits(barriers).ok_or_else(|| {
            // extra bits...
            NglError::InvalidValue(format!(
                "memory_barrier mask {:#010x} contains unknown barrier bits",
                barriers
            ))
        })?;

        log::trace!("memory_barrier {:?}", mask);
        Ok(())
    }

    /// By-region flavor of [`memory_barrier`](Self::memory_barrier): only the
    /// scopes that operate per framebuffer region are legal.
    pub fn memory_barrier_by_region(
        &mut self,
        barriers: GLbitfield,
    ) -> NglResult<()> {
        let mask = NglMemoryBarrierMask::from_bits(barriers)
            .filter(|mask| NglMemoryBarrierMask::BY_REGION.contains(*mask))
            .ok_or_else(|| {
                NglError::InvalidValue(format!(
                    "memory_barrier_by_region mask {:#010x} contains bits outside the by-region set",
                    barriers
                ))
            })?;

        log::trace!("memory_barrier_by_region {:?}", mask);
        Ok(())
    }

    /// Texture barrier entry point. Present for API completeness; the
    /// command translation layer has no implementation for it.
    pub fn texture_barrier(&mut self) -> NglResult<()> {
        Err(NglError::Unsupported("texture_barrier"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::NglSoftwareBackend;
    use crate::glcore;
    use std::sync::Arc;

    fn context() -> NglContext {
        NglContext::new(Arc::new(NglSoftwareBackend::new()))
    }

    #[test]
    fn memory_barrier_accepts_legal_subsets() {
        let mut context = context();

        context.memory_barrier(0).unwrap();
        context
            .memory_barrier(glcore::SHADER_IMAGE_ACCESS_BARRIER_BIT)
            .unwrap();
        context
            .memory_barrier(
                glcore::VERTEX_ATTRIB_ARRAY_BARRIER_BIT
                    | glcore::ELEMENT_ARRAY_BARRIER_BIT
                    | glcore::COMMAND_BARRIER_BIT
                    | glcore::TRANSFORM_FEEDBACK_BARRIER_BIT,
            )
            .unwrap();
        context
            .memory_barrier(NglMemoryBarrierMask::all().bits())
            .unwrap();
    }

    #[test]
    fn memory_barrier_rejects_foreign_bits() {
        let mut context = context();

        // ALL_BARRIER_BITS carries bits this implementation does not know
        match context.memory_barrier(glcore::ALL_BARRIER_BITS) {
            Err(NglError::InvalidValue(_)) => {}
            other => panic!("expected InvalidValue, got {:?}", other),
        }

        match context.memory_barrier(0x0001_0000) {
            Err(NglError::InvalidValue(_)) => {}
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn by_region_accepts_only_the_region_scopes() {
        let mut context = context();

        context.memory_barrier_by_region(0).unwrap();
        context
            .memory_barrier_by_region(
                glcore::ATOMIC_COUNTER_BARRIER_BIT
                    | glcore::FRAMEBUFFER_BARRIER_BIT
                    | glcore::SHADER_IMAGE_ACCESS_BARRIER_BIT
                    | glcore::SHADER_STORAGE_BARRIER_BIT
                    | glcore::TEXTURE_FETCH_BARRIER_BIT
                    | glcore::UNIFORM_BARRIER_BIT,
            )
            .unwrap();

        // Legal pipeline-wide scope, but not a by-region scope
        match context.memory_barrier_by_region(glcore::COMMAND_BARRIER_BIT) {
            Err(NglError::InvalidValue(_)) => {}
            other => panic!("expected InvalidValue, got {:?}", other),
        }

        match context.memory_barrier_by_region(0x0001_0000) {
            Err(NglError::InvalidValue(_)) => {}
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn barrier_validation_leaves_fence_state_alone() {
        let backend = NglSoftwareBackend::new();
        let mut context = NglContext::new(Arc::new(backend.clone()));
        backend.submit();

        let fence = context
            .fence_sync(glcore::SYNC_GPU_COMMANDS_COMPLETE, 0)
            .unwrap();

        let _ = context.memory_barrier(glcore::ALL_BARRIER_BITS);
        let _ = context.memory_barrier_by_region(glcore::COMMAND_BARRIER_BIT);

        let mut values = [-1];
        context
            .get_sync_iv(fence, glcore::SYNC_STATUS, 1, &mut values)
            .unwrap();
        assert_eq!(values[0], glcore::UNSIGNALED as glcore::GLint);
        assert_eq!(context.live_sync_count(), 1);
    }

    #[test]
    fn texture_barrier_is_unsupported() {
        let mut context = context();

        match context.texture_barrier() {
            Err(NglError::Unsupported(_)) => {}
            other => panic!("expected Unsupported, got {:?}", other),
        }
    }
}
