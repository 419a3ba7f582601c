//! GPU/CPU synchronization layer of the NGL OpenGL-compatibility runtime.
//!
//! NGL re-implements the standard GL API on top of a native command-queue
//! backend. This crate is the piece that keeps the CPU-visible fence state
//! machine consistent with the backend's asynchronous completion signals:
//! fence sync objects, non-blocking status queries, indefinite blocking
//! waits, and memory barrier validation.
//!
//! The backend is reached only through the [`NglSyncBackend`] trait, injected
//! into an [`NglContext`] at construction. [`backends::NglSoftwareBackend`]
//! is an in-tree implementation whose "GPU" is any thread that advances a
//! completion timeline; the native queue backends live with the command
//! translation layer.

pub mod backends;
pub mod glcore;

mod backend;
pub use backend::*;

mod barrier;

mod context;
pub use context::*;

mod error;
pub use error::*;

mod fence;
pub use fence::*;

mod types;
pub use types::*;
