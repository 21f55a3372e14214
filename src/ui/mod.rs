//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - Layout and view dispatch
//! - `articles` - Article card list and single-article views
//! - `status` - Status bar widget

mod articles;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
