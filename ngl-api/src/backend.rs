use crate::{NglResult, NglSignalHandle};

/// The boundary between the sync layer and the native command-queue backend.
///
/// A backend mints one [`NglSignalHandle`] per fence at creation time and is
/// the only party that can interpret it. The handle must become observable as
/// fired once all GPU work submitted before the `attach_signal` call has
/// completed; work submitted afterward carries no ordering guarantee.
///
/// Failures from these operations are configuration errors (a dead queue, a
/// lost device), not conditions the sync layer recovers from; they propagate
/// to the caller verbatim.
pub trait NglSyncBackend: Send + Sync {
    /// Mint a completion signal covering everything submitted to the queue so
    /// far. Called once per fence, at fence creation.
    fn attach_signal(&self) -> NglResult<NglSignalHandle>;

    /// Report whether the signal has fired, without blocking.
    fn poll_signal(
        &self,
        signal: NglSignalHandle,
    ) -> NglResult<bool>;

    /// Block the calling thread until the signal fires. There is no timeout
    /// and no cancellation; once issued the wait runs to completion.
    fn await_signal(
        &self,
        signal: NglSignalHandle,
    ) -> NglResult<()>;
}
