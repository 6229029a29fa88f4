//! podscope-core: process bootstrap shared by `podscoped` and `traffic-gen`.
//!
//! Both binaries build their tracing subscriber and wait for shutdown the
//! same way, so that code lives here rather than in each `main.rs`.

pub mod logging;
pub mod shutdown;

pub use logging::{LogFormat, LoggingError};
