//! Generation pipeline.
//!
//! [`Orchestrator`] runs one discovery round: extract, validate and
//! synthesize every marked declaration of the round (Collecting), then hand
//! the resulting units to the emitter (Emitting). [`Driver`] owns the round
//! loop and feeds emitted units back in until a round observes no new
//! declarations.

pub mod driver;
pub mod orchestrator;

pub use driver::{Driver, DriverReport};
pub use orchestrator::{Orchestrator, RoundReport, RoundState};
