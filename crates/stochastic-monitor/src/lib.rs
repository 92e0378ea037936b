//! Logging setup and signal reports.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::SignalReport;
