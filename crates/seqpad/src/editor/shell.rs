//! UI-independent command dispatch
//!
//! [`EditorShell`] wires the state machine to a [`Frontend`]: the frontend
//! turns raw input into [`Command`]s, the shell runs them against the
//! state and pushes the results (text, image, tint, status) back out.
//! Nothing here knows about terminals or windows.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::core::DiagramError;
use crate::diagram::RenderedImage;

use super::state::{EditorState, EvalState, SaveOutcome};

/// Tint applied to the editor pane while the source does not evaluate
pub const INVALID_TINT: (u8, u8, u8) = (205, 79, 57);

/// Shown by the About command
pub const ABOUT_TEXT: &str = "seqpad - a small sequence diagram editor.\n\
Type a diagram, evaluate it, and save the source or the rendered image.";

/// Shown by the Help command
pub const HELP_TEXT: &str = "Diagrams look like this:\n\
\n\
  diagram {\n\
    browser -> webserver [label = \"GET /index.html\"];\n\
    browser <-- webserver;\n\
  }\n\
\n\
Arrows: ->  <-  (solid)  -->  <--  (dotted).\n\
Evaluate re-renders the image; a red tint means the source does not\n\
parse and the previous image is still shown.";

/// Everything a user can ask the editor to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Evaluate,
    Save,
    SaveAs,
    Open,
    About,
    Help,
    Exit,
}

/// A destination picked in a Save-As interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChoice {
    pub directory: PathBuf,
    pub file_name: String,
}

/// The capability set a concrete UI must provide
///
/// Dialog methods return `None` when the user cancels.
pub trait Frontend {
    /// Current contents of the editor pane
    fn editor_text(&self) -> String;
    fn set_editor_text(&mut self, text: &str);
    /// `Some(rgb)` tints the editor pane, `None` restores the default
    fn set_editor_tint(&mut self, tint: Option<(u8, u8, u8)>);
    fn show_image(&mut self, image: &RenderedImage);
    fn set_status(&mut self, message: &str);
    fn set_title(&mut self, title: &str);
    fn ask_open_path(&mut self) -> Option<PathBuf>;
    fn ask_save_path(&mut self, suggested_name: &str) -> Option<FileChoice>;
    fn show_info(&mut self, title: &str, body: &str);
}

/// Dispatches commands against the editor state and keeps a frontend
/// in sync with it
pub struct EditorShell<F: Frontend> {
    state: EditorState,
    frontend: F,
    running: bool,
}

impl<F: Frontend> EditorShell<F> {
    /// Wrap a state and frontend, pushing the initial state out
    pub fn new(state: EditorState, frontend: F) -> Self {
        let mut shell = Self {
            state,
            frontend,
            running: true,
        };
        shell.frontend.set_editor_text(shell.state.source());
        shell.frontend.set_title(&shell.state.title());
        shell.sync_evaluation();
        shell
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    /// False once the Exit command has run
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one command to completion
    ///
    /// Recoverable failures (unreadable file, failed write, cancelled
    /// dialog) end up on the status line; only renderer failures on valid
    /// input propagate.
    pub fn dispatch(&mut self, command: Command) -> Result<(), DiagramError> {
        debug!(?command, "dispatching");
        match command {
            Command::Evaluate => self.evaluate()?,
            Command::Save => self.save()?,
            Command::SaveAs => self.save_as()?,
            Command::Open => self.open()?,
            Command::About => self.frontend.show_info("About", ABOUT_TEXT),
            Command::Help => self.frontend.show_info("Help", HELP_TEXT),
            Command::Exit => self.running = false,
        }
        Ok(())
    }

    fn evaluate(&mut self) -> Result<(), DiagramError> {
        let text = self.frontend.editor_text();
        self.state.edit(text)?;
        self.sync_evaluation();
        Ok(())
    }

    fn save(&mut self) -> Result<(), DiagramError> {
        // Sync the buffer into the state first so the file matches what
        // is on screen.
        let text = self.frontend.editor_text();
        self.state.edit(text)?;
        self.sync_evaluation();

        match self.state.save() {
            Ok(SaveOutcome::Written(path)) => {
                self.frontend
                    .set_status(&format!("Saved {}", path.display()));
            }
            Ok(SaveOutcome::PathRequired) => return self.save_as(),
            Err(error) => {
                warn!(%error, "save failed");
                self.frontend.set_status(&format!("Save failed: {error}"));
            }
        }
        Ok(())
    }

    fn save_as(&mut self) -> Result<(), DiagramError> {
        let suggested = self.state.suggested_file_name();
        let Some(choice) = self.frontend.ask_save_path(&suggested) else {
            self.frontend.set_status("Save cancelled");
            return Ok(());
        };

        match self.state.save_to(choice.directory, choice.file_name) {
            Ok(path) => {
                self.frontend.set_title(&self.state.title());
                self.frontend
                    .set_status(&format!("Saved {}", path.display()));
            }
            Err(error) => {
                warn!(%error, "save-as failed");
                self.frontend.set_status(&format!("Save failed: {error}"));
            }
        }
        Ok(())
    }

    fn open(&mut self) -> Result<(), DiagramError> {
        let Some(path) = self.frontend.ask_open_path() else {
            self.frontend.set_status("Open cancelled");
            return Ok(());
        };

        match self.state.open(&path) {
            Ok(_) => {
                self.frontend.set_editor_text(self.state.source());
                self.frontend.set_title(&self.state.title());
                self.sync_evaluation();
            }
            Err(error) if matches!(error, DiagramError::Io { .. }) => {
                warn!(%error, path = %path.display(), "open failed");
                self.frontend.set_status(&format!("Open failed: {error}"));
            }
            Err(error) => return Err(error),
        }
        Ok(())
    }

    /// Push the evaluation outcome out: image and clear tint on success,
    /// tint and message on a parse failure
    fn sync_evaluation(&mut self) {
        match self.state.eval_state() {
            EvalState::Idle => {
                self.frontend.set_editor_tint(None);
                if let Some(image) = self.state.image() {
                    self.frontend.show_image(image);
                }
                self.frontend.set_status("Ready");
            }
            EvalState::Invalid { message } => {
                let message = message.clone();
                self.frontend.set_editor_tint(Some(INVALID_TINT));
                self.frontend.set_status(&message);
            }
        }
    }
}
