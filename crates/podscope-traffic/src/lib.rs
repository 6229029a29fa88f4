//! podscope-traffic: synthetic load for the podscope backend.
//!
//! Every interval the generator issues one GET against each backend
//! endpoint, strictly in order, and logs what came back.
//!
//! # Architecture
//!
//! ```text
//! PollScheduler (fixed ticker, shutdown-aware)
//!   └── TrafficGenerator::run_cycle()
//!         ├── cycle deadline (30s) shared by all requests
//!         └── probe::get() per endpoint, 10s timeout each
//!               └── Outcome: Completed { status } | Failed(RequestError)
//! ```
//!
//! Cycles never overlap. A slow cycle delays the next tick instead of
//! queueing extra ones.

pub mod config;
pub mod cycle;
pub mod probe;
pub mod scheduler;

pub use config::{Cli, ConfigError, GeneratorConfig};
pub use cycle::{CycleReport, Outcome, RequestOutcome, TrafficGenerator};
pub use probe::RequestError;
pub use scheduler::PollScheduler;
