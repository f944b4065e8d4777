//! Shared infrastructure: errors, renderer configuration, the character
//! canvas, and logging.

mod canvas;
mod config;
mod error;
pub mod logging;

pub use canvas::*;
pub use config::*;
pub use error::*;
pub use logging::*;
