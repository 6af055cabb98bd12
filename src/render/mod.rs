//! Rendering module: offset-preserving text and JSON output.

mod json;
mod text;

pub use json::{to_json, write_json_lines, JsonFormat};
pub use text::{blank, TextBuilder};
