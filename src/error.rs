use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface error: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),
}

/// Growing the ray set or segment buffer failed. Fatal for the process.
///
/// Kept apart from [`Error`] because it crosses rayon task boundaries.
#[derive(Debug, Error)]
#[error("failed to allocate {requested} {what}")]
pub struct AllocationError {
    pub what: &'static str,
    pub requested: usize,
    #[source]
    pub source: std::collections::TryReserveError,
}

pub type Result<T> = std::result::Result<T, Error>;
