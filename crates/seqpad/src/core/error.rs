//! Error types for diagram compilation and rendering
//!
//! Parse failures are ordinary values the editor branches on; everything
//! else propagates to the caller.

use thiserror::Error;

/// Errors produced by the compile/render pipeline
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("parse error: {message} at line {line}, column {column}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("layout error: {message}")]
    Layout { message: String },

    #[error("render error: {message}")]
    Render { message: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("unknown image format: {name}")]
    UnknownFormat { name: String },
}

impl DiagramError {
    /// Create a parse error at a source position
    pub fn parse(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a layout error
    pub fn layout(message: impl Into<String>) -> Self {
        Self::Layout {
            message: message.into(),
        }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// True for the one error kind that is expected during interactive use
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let error = DiagramError::parse("unexpected token", 3, 14);
        let msg = format!("{}", error);
        assert!(msg.contains("parse error"));
        assert!(msg.contains("unexpected token"));
        assert!(msg.contains("line 3"));
        assert!(msg.contains("column 14"));
    }

    #[test]
    fn test_is_parse() {
        assert!(DiagramError::parse("bad", 1, 1).is_parse());
        assert!(!DiagramError::render("bad").is_parse());
        assert!(!DiagramError::layout("bad").is_parse());
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let error: DiagramError = io_err.into();
        let msg = format!("{}", error);
        assert!(msg.contains("io error"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_unknown_format_display() {
        let error = DiagramError::UnknownFormat {
            name: "bmp".to_string(),
        };
        assert!(format!("{}", error).contains("bmp"));
    }
}
