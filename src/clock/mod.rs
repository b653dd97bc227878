//! The clock core.
//!
//! - `controller`: session/break state machine, lengths and alert trigger
//! - `ticker`: cancellable one-second interval
//! - `runtime`: event loop feeding ticks and intents to the controller

pub mod controller;
pub mod error;
pub mod runtime;
pub mod ticker;

pub use controller::{ClockEvent, TimerController};
pub use error::ClockError;
pub use runtime::{run, spawn_interrupt_listener, ClockInput, Renderer};
pub use ticker::{IntervalHandle, ManualScheduler, TickScheduler, TokioScheduler, TICK_PERIOD};
