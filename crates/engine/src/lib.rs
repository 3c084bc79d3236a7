//! Engine module - hosts sessions in real (or virtual) time
//!
//! The core session never sleeps; this crate supplies everything around it:
//!
//! - [`Clock`]: monotonic millisecond readings ([`TokioClock`], [`ManualClock`])
//! - [`Scheduler`]: the timer queue the session's effects are applied to
//! - [`GameDriver`]: session + scheduler + content provider, one await point (loading)
//! - [`spawn_session`]: runs a driver on a tokio task behind a [`SessionHandle`]
//! - [`EngineConfig`]: `MEMORY_MATCH_*` environment configuration
//! - [`AutoPlayer`]: a perfect-memory player on simulated time

pub mod autoplay;
pub mod clock;
pub mod config;
pub mod driver;
pub mod runtime;
pub mod scheduler;

use thiserror::Error;

pub use autoplay::AutoPlayer;
pub use clock::{Clock, ManualClock, TokioClock};
pub use config::EngineConfig;
pub use driver::GameDriver;
pub use runtime::{spawn_session, SessionHandle};
pub use scheduler::{Scheduled, Scheduler};

/// Engine-level failures.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Content(#[from] memory_match_content::ContentError),

    #[error("session task has stopped")]
    Closed,

    #[error("session task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
