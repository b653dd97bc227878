//! Clock error types.

use thiserror::Error;

/// Errors raised by the controller and its event loop.
#[derive(Debug, Error)]
pub enum ClockError {
    /// The receiver of controller events was dropped.
    #[error("event channel closed while sending {0}")]
    EventChannelClosed(&'static str),

    /// Every sender feeding the event loop was dropped.
    #[error("input channel closed")]
    InputChannelClosed,

    /// Rendering to the terminal failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
