use std::sync::{Arc, Condvar, Mutex};

use crate::{NglResult, NglSignalHandle, NglSyncBackend};

// Submission/completion positions on the timeline. `completed` trails
// `submitted` and only ever moves forward.
struct TimelineState {
    submitted: u64,
    completed: u64,
}

struct NglSoftwareBackendInner {
    state: Mutex<TimelineState>,
    fired: Condvar,
}

/// Software reference implementation of [`NglSyncBackend`].
///
/// The queue is a monotonically advancing timeline: [`submit`](Self::submit)
/// stands in for handing a batch of GPU work to the native queue, and any
/// thread playing the GPU calls [`complete`](Self::complete) (or
/// [`complete_all`](Self::complete_all)) to retire work. A signal minted at
/// submission position `n` fires once the completed position reaches `n`, so
/// a fence covers exactly the work submitted before it was created.
///
/// Clones share one timeline.
#[derive(Clone)]
pub struct NglSoftwareBackend {
    inner: Arc<NglSoftwareBackendInner>,
}

impl Default for NglSoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NglSoftwareBackend {
    pub fn new() -> Self {
        NglSoftwareBackend {
            inner: Arc::new(NglSoftwareBackendInner {
                state: Mutex::new(TimelineState {
                    submitted: 0,
                    completed: 0,
                }),
                fired: Condvar::new(),
            }),
        }
    }

    /// Advance the submission position by one batch and return it.
    pub fn submit(&self) -> u64 {
        let mut state = self.inner.state.lock().unwrap();
        state.submitted += 1;
        log::trace!("software queue submitted through {}", state.submitted);
        state.submitted
    }

    /// Retire all work at or before `point` and wake every waiter.
    pub fn complete(
        &self,
        point: u64,
    ) {
        let mut state = self.inner.state.lock().unwrap();
        if point > state.completed {
            state.completed = point.min(state.submitted);
            log::trace!("software queue completed through {}", state.completed);
            self.inner.fired.notify_all();
        }
    }

    /// Retire everything submitted so far.
    pub fn complete_all(&self) {
        let mut state = self.inner.state.lock().unwrap();
        if state.completed < state.submitted {
            state.completed = state.submitted;
            log::trace!("software queue completed through {}", state.completed);
            self.inner.fired.notify_all();
        }
    }

    pub fn submitted(&self) -> u64 {
        self.inner.state.lock().unwrap().submitted
    }

    pub fn completed(&self) -> u64 {
        self.inner.state.lock().unwrap().completed
    }
}

impl NglSyncBackend for NglSoftwareBackend {
    fn attach_signal(&self) -> NglResult<NglSignalHandle> {
        let state = self.inner.state.lock().unwrap();
        Ok(NglSignalHandle::new(state.submitted))
    }

    fn poll_signal(
        &self,
        signal: NglSignalHandle,
    ) -> NglResult<bool> {
        let state = self.inner.state.lock().unwrap();
        Ok(state.completed >= signal.raw())
    }

    fn await_signal(
        &self,
        signal: NglSignalHandle,
    ) -> NglResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        while state.completed < signal.raw() {
            state = self.inner.fired.wait(state).unwrap();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn signal_on_empty_timeline_is_already_fired() {
        let backend = NglSoftwareBackend::new();

        let signal = backend.attach_signal().unwrap();
        assert!(backend.poll_signal(signal).unwrap());
        backend.await_signal(signal).unwrap();
    }

    #[test]
    fn signal_covers_work_submitted_before_attach_only() {
        let backend = NglSoftwareBackend::new();

        let first = backend.submit();
        let signal = backend.attach_signal().unwrap();
        backend.submit();

        assert!(!backend.poll_signal(signal).unwrap());

        // Retiring the pre-attach batch is enough to fire the signal even
        // with later work still outstanding
        backend.complete(first);
        assert!(backend.poll_signal(signal).unwrap());
        assert!(backend.completed() < backend.submitted());
    }

    #[test]
    fn completion_never_regresses() {
        let backend = NglSoftwareBackend::new();

        backend.submit();
        backend.submit();
        backend.complete_all();
        backend.complete(1);
        assert_eq!(backend.completed(), 2);
    }

    #[test]
    fn completion_cannot_pass_submission() {
        let backend = NglSoftwareBackend::new();

        backend.submit();
        backend.complete(100);
        assert_eq!(backend.completed(), 1);
    }

    #[test]
    fn await_blocks_until_another_thread_completes() {
        let backend = NglSoftwareBackend::new();
        let point = backend.submit();
        let signal = backend.attach_signal().unwrap();

        let gpu = {
            let backend = backend.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                backend.complete(point);
            })
        };

        backend.await_signal(signal).unwrap();
        assert!(backend.poll_signal(signal).unwrap());
        gpu.join().unwrap();
    }
}
