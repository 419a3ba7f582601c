use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ngl_api::backends::NglSoftwareBackend;
use ngl_api::glcore;
use ngl_api::{NglContext, NglResult};

pub fn logging_init() {
    #[cfg(not(debug_assertions))]
    let log_level = log::LevelFilter::Info;
    #[cfg(debug_assertions)]
    let log_level = log::LevelFilter::Debug;

    // Setup logging
    env_logger::Builder::from_default_env()
        .default_format_timestamp_nanos(true)
        .filter_module("ngl_api", log::LevelFilter::Trace)
        .filter_level(log_level)
        .init();
}

// Drives the sync layer end to end against the software backend, with a
// second thread playing the GPU.
fn main() -> NglResult<()> {
    logging_init();

    let backend = NglSoftwareBackend::new();
    let mut context = NglContext::new(Arc::new(backend.clone()));

    // Stand-ins for draw submissions
    backend.submit();
    let second_batch = backend.submit();

    let fence = context.fence_sync(glcore::SYNC_GPU_COMMANDS_COMPLETE, 0)?;
    log::info!("created fence {}", fence.name());

    let mut status = [0];
    context.get_sync_iv(fence, glcore::SYNC_STATUS, 1, &mut status)?;
    log::info!(
        "status before completion: {}",
        if status[0] == glcore::SIGNALED as i32 {
            "signaled"
        } else {
            "unsignaled"
        }
    );

    let gpu = {
        let backend = backend.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            log::info!("gpu thread retiring work through batch {}", second_batch);
            backend.complete(second_batch);
        })
    };

    let waited = context.client_wait_sync(
        fence,
        glcore::SYNC_FLUSH_COMMANDS_BIT,
        glcore::TIMEOUT_IGNORED,
    )?;
    log::info!("client wait returned {:?}", waited);

    context.get_sync_iv(fence, glcore::SYNC_STATUS, 1, &mut status)?;
    log::info!(
        "status after wait: {}",
        if status[0] == glcore::SIGNALED as i32 {
            "signaled"
        } else {
            "unsignaled"
        }
    );

    context.memory_barrier(
        glcore::SHADER_IMAGE_ACCESS_BARRIER_BIT | glcore::SHADER_STORAGE_BARRIER_BIT,
    )?;
    context.memory_barrier_by_region(glcore::FRAMEBUFFER_BARRIER_BIT)?;

    context.delete_sync(fence)?;
    context.wait_idle()?;
    gpu.join().expect("gpu thread panicked");

    log::info!("done");
    Ok(())
}
