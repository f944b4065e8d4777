//! Seqpad - edit, evaluate, and save seqdiag-style sequence diagrams
//!
//! The crate has two halves. The `diagram` module is the compile/render
//! pipeline: source text in, typed parse failure or encoded image out. The
//! `editor` module is the workflow around it: the edit-evaluate-render-save
//! state machine and the frontend abstraction a concrete UI plugs into.
//!
//! # Quick Start
//!
//! ```rust
//! use seqpad::evaluate;
//!
//! let image = evaluate("diagram { a -> b; }").unwrap();
//! assert!(!image.is_empty());
//! ```
//!
//! # Editor workflow
//!
//! ```rust
//! use seqpad::editor::{EditorState, EvalState};
//! use seqpad::core::RenderConfig;
//!
//! let mut editor = EditorState::new(RenderConfig::default()).unwrap();
//! editor.edit("diagram { a -> b; }".to_string()).unwrap();
//! assert!(matches!(editor.eval_state(), EvalState::Idle));
//! ```

pub mod core;
pub mod diagram;
pub mod editor;

pub use crate::core::{DiagramError, ImageFormat, RenderConfig};
pub use crate::diagram::{compile, CompiledDiagram, DiagramRenderer, RenderedImage};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{DiagramError, ImageFormat, RenderConfig, TextCanvas};
    pub use crate::diagram::{
        compile, Actor, CompiledDiagram, DiagramRenderer, Exchange, LineStyle, RenderedImage,
    };
    pub use crate::editor::{
        Command, EditorShell, EditorState, EvalState, FileChoice, Frontend, SaveMode, SaveOutcome,
    };
}

/// Compile and render diagram source with the default configuration
///
/// One evaluate cycle without the editor: parse failures come back as
/// [`DiagramError::Parse`], anything else means the renderer itself failed.
pub fn evaluate(source: &str) -> Result<RenderedImage, DiagramError> {
    evaluate_with_config(source, RenderConfig::default())
}

/// Compile and render diagram source with an explicit configuration
pub fn evaluate_with_config(
    source: &str,
    config: RenderConfig,
) -> Result<RenderedImage, DiagramError> {
    let diagram = compile(source)?;
    DiagramRenderer::with_config(config)?.render(&diagram)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_valid_source() {
        let image = evaluate("diagram { a -> b; }").unwrap();
        assert!(!image.is_empty());
        assert_eq!(image.format(), ImageFormat::Png);
    }

    #[test]
    fn test_evaluate_invalid_source() {
        let err = evaluate("diagram { a -> ").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_evaluate_with_text_format() {
        let config = RenderConfig::new(ImageFormat::Text, false);
        let image = evaluate_with_config("diagram { a -> b; }", config).unwrap();
        assert!(image.as_text().unwrap().contains('a'));
    }
}
