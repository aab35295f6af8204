pub mod formatter;

pub use formatter::{format_json, format_opening, format_open_failed, should_use_colors};
