//! Trip Stats - Application Library
//!
//! This is the command-line crate that wires history loading, the trip
//! statistics engine and output rendering together.

mod app;
mod logging;

pub use app::{CliError, DeviceHistory, DeviceReport, OutputFormat, Settings, analyze, run};
pub use logging::setup_logging;
