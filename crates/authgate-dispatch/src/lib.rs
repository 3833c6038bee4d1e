//! # authgate-dispatch
//!
//! Runs admitted streams on independent tokio tasks and decides when the
//! admission phase is over.
//!
//! - [`Dispatcher`] checks and increments the bounded admission counter and
//!   spawns one task per accepted stream.
//! - [`CompletionCoordinator`] waits for capacity, timeout, or an external
//!   signal, then drains every admitted task.
//! - [`MetricsAccumulator`] and [`OutcomeCounters`] collect what the final
//!   [`ShutdownReport`] prints.

pub mod coordinator;
pub mod dispatcher;
pub mod engine;
pub mod metrics;
pub mod report;

pub use coordinator::{CompletionCoordinator, ShutdownTrigger};
pub use dispatcher::{Admission, AdmissionRejection, DispatchStatus, Dispatcher};
pub use engine::{Engine, EngineStatus};
pub use metrics::{DurationSummary, MetricsAccumulator, OutcomeCounters, OutcomeSnapshot};
pub use report::ShutdownReport;
