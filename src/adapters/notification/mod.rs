//! Report delivery adapters.

pub mod html_report;

pub use html_report::{notify_best_effort, HtmlReportSink};
