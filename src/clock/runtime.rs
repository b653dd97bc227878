//! Event loop that owns the controller.
//!
//! Ticks, user intents and shutdown requests all arrive as [`ClockInput`]
//! messages on one channel. The loop applies each one to the controller,
//! forwards the resulting events to a [`Renderer`], then renders a fresh
//! snapshot. Nothing else ever touches controller state.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::types::{Intent, Snapshot};

use super::controller::{ClockEvent, TimerController};
use super::error::ClockError;
use super::ticker::TickScheduler;

// ============================================================================
// ClockInput
// ============================================================================

/// Messages consumed by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockInput {
    /// One second elapsed on the interval tagged `generation`
    Tick {
        /// Generation of the interval that produced the tick
        generation: u64,
    },
    /// A user intent
    Intent(Intent),
    /// Input that could not be understood
    Unrecognized(String),
    /// Stop the loop
    Quit,
}

// ============================================================================
// Renderer
// ============================================================================

/// Presentation layer driven by the event loop.
pub trait Renderer {
    /// Draws the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the output fails.
    fn render(&mut self, snapshot: &Snapshot) -> std::io::Result<()>;

    /// Reports a controller event. Called before the following `render`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the output fails.
    fn event(&mut self, event: &ClockEvent) -> std::io::Result<()>;

    /// Reports input that was not understood.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the output fails.
    fn unrecognized(&mut self, input: &str) -> std::io::Result<()>;
}

// ============================================================================
// Event loop
// ============================================================================

/// Runs the clock until a [`ClockInput::Quit`] arrives.
///
/// Returns the last snapshot.
///
/// # Errors
///
/// Returns an error if a channel closes unexpectedly or output fails.
pub async fn run<S, R>(
    mut controller: TimerController<S>,
    mut input_rx: mpsc::UnboundedReceiver<ClockInput>,
    mut event_rx: mpsc::UnboundedReceiver<ClockEvent>,
    renderer: &mut R,
) -> Result<Snapshot, ClockError>
where
    S: TickScheduler,
    R: Renderer,
{
    info!("Clock started");
    renderer.render(&controller.snapshot())?;

    loop {
        let input = input_rx.recv().await.ok_or(ClockError::InputChannelClosed)?;

        match input {
            ClockInput::Tick { generation } => {
                if !controller.tick(generation)? {
                    continue;
                }
            }
            ClockInput::Intent(intent) => controller.apply(intent)?,
            ClockInput::Unrecognized(text) => {
                debug!(input = %text, "Unrecognized input");
                renderer.unrecognized(&text)?;
                continue;
            }
            ClockInput::Quit => {
                info!("Clock stopped");
                break;
            }
        }

        while let Ok(event) = event_rx.try_recv() {
            renderer.event(&event)?;
        }
        renderer.render(&controller.snapshot())?;
    }

    Ok(controller.snapshot())
}

/// Sends [`ClockInput::Quit`] when Ctrl-C is pressed.
pub fn spawn_interrupt_listener(
    input_tx: mpsc::UnboundedSender<ClockInput>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                debug!("Interrupt received");
                let _ = input_tx.send(ClockInput::Quit);
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
