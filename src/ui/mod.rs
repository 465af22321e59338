//! User interface module - terminal messages and result rendering.
//!
//! Results go to stdout untouched; everything meant for a human reader goes to stderr.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_status, render_json, render_markdown,
};

/// Print a result to stdout.
pub fn print_result(text: &str) {
    println!("{}", text);
}
