//! The editing workflow around the diagram pipeline
//!
//! [`EditorState`] is the state machine (source text, last good image,
//! persistence record); [`EditorShell`] drives it from [`Command`]s and
//! mirrors it into whatever [`Frontend`] the binary provides.

mod shell;
mod state;

pub use shell::{Command, EditorShell, FileChoice, Frontend, ABOUT_TEXT, HELP_TEXT, INVALID_TINT};
pub use state::{EditorState, EvalState, PersistenceRecord, SaveMode, SaveOutcome, START_DIAGRAM};
