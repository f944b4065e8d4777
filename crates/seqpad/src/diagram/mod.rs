//! Diagram compilation and rendering
//!
//! The editor treats this module as a black box with two operations:
//! [`compile`] turns source text into a [`CompiledDiagram`] or a typed parse
//! failure, and [`DiagramRenderer::render`] turns a compiled diagram into an
//! encoded image.
//!
//! Source syntax (seqdiag style):
//! ```text
//! diagram {
//!   browser  -> webserver [label = "GET /index.html"];
//!   browser <-- webserver;
//! }
//! ```

mod layout;
mod model;
mod parser;
mod raster;
mod render;

pub use layout::{DiagramLayout, LayoutEngine, PlacedActor, PlacedExchange};
pub use model::{Actor, CompiledDiagram, Exchange, LineStyle};
pub use parser::compile;
pub use render::{DiagramRenderer, RenderedImage};
