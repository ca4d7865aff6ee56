//! Output formatting for CLI.

mod json;
mod text;

pub use json::{JsonFormatter, MetricInfoOutput};
pub use text::{TextFormatter, format_interval};
