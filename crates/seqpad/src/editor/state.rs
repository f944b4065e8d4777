//! The edit-evaluate-render-save state machine
//!
//! Owns the source text, the last good rendered image, and the persistence
//! record. Everything runs synchronously inside one UI dispatch: there is
//! no worker thread, no cancellation, and no caching across cycles.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{DiagramError, RenderConfig};
use crate::diagram::{compile, DiagramRenderer, RenderedImage};

/// The built-in starter diagram shown on a fresh session
pub const START_DIAGRAM: &str = r#"diagram {
  browser -> webserver [label = "GET /index.html"];
  browser <-- webserver;
  browser -> webserver [label = "POST /blog/comment"];
  webserver -> database [label = "INSERT comment"];
  webserver <-- database;
  browser <-- webserver;
}
"#;

/// Observable evaluation state
///
/// There is no `Evaluating` variant: a cycle runs to completion inside a
/// single synchronous call, so the mid-cycle state is never visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalState {
    /// Last evaluate succeeded; the stored image is current
    Idle,
    /// Last evaluate failed to parse; the previous image is retained
    Invalid { message: String },
}

impl EvalState {
    pub fn is_invalid(&self) -> bool {
        matches!(self, EvalState::Invalid { .. })
    }
}

/// What `Save` writes: the source text or the rendered image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    #[default]
    Source,
    Image,
}

/// Where the session saves to, and whether it ever has
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceRecord {
    pub file_name: String,
    pub directory: PathBuf,
    /// True only after at least one successful write; gates whether `Save`
    /// overwrites silently or has to ask for a path first
    pub already_saved: bool,
}

impl PersistenceRecord {
    fn fresh() -> Self {
        Self {
            file_name: "simple.diag".to_string(),
            directory: PathBuf::from("."),
            already_saved: false,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Result of a `save()` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to the recorded path
    Written(PathBuf),
    /// No path on record yet; the caller must run the Save-As interaction
    PathRequired,
}

/// The editor core: source text plus the results of the last cycle
pub struct EditorState {
    source: String,
    image: Option<RenderedImage>,
    eval: EvalState,
    record: PersistenceRecord,
    mode: SaveMode,
    renderer: DiagramRenderer,
}

impl EditorState {
    /// Fresh session from the built-in template; evaluates it once so the
    /// display starts with a rendered image
    pub fn new(config: RenderConfig) -> Result<Self, DiagramError> {
        let mut state = Self {
            source: START_DIAGRAM.to_string(),
            image: None,
            eval: EvalState::Idle,
            record: PersistenceRecord::fresh(),
            mode: SaveMode::default(),
            renderer: DiagramRenderer::with_config(config)?,
        };
        state.evaluate()?;
        Ok(state)
    }

    /// Session starting from a file on disk
    pub fn from_file(path: &Path, config: RenderConfig) -> Result<Self, DiagramError> {
        let mut state = Self::new(config)?;
        state.open(path)?;
        Ok(state)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The last good render, if any cycle has succeeded yet
    pub fn image(&self) -> Option<&RenderedImage> {
        self.image.as_ref()
    }

    pub fn eval_state(&self) -> &EvalState {
        &self.eval
    }

    pub fn record(&self) -> &PersistenceRecord {
        &self.record
    }

    pub fn mode(&self) -> SaveMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SaveMode) {
        self.mode = mode;
    }

    /// Window/status title, e.g. `Editing simple.diag`
    pub fn title(&self) -> String {
        format!("Editing {}", self.record.file_name)
    }

    /// File name to preselect in the Save-As dialog
    pub fn suggested_file_name(&self) -> String {
        match self.mode {
            SaveMode::Source => self.record.file_name.clone(),
            SaveMode::Image => {
                let stem = Path::new(&self.record.file_name)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("diagram");
                let extension = self
                    .image
                    .as_ref()
                    .map(|image| image.format().extension())
                    .unwrap_or("png");
                format!("{}.{}", stem, extension)
            }
        }
    }

    /// Replace the source text and evaluate it
    pub fn edit(&mut self, text: String) -> Result<&EvalState, DiagramError> {
        self.source = text;
        self.evaluate()
    }

    /// One compile+render cycle
    ///
    /// A parse failure is an ordinary outcome: the state flips to
    /// `Invalid` and the previous image stays on display. A renderer
    /// failure on a valid diagram propagates as an error and leaves the
    /// stored image untouched.
    pub fn evaluate(&mut self) -> Result<&EvalState, DiagramError> {
        match compile(&self.source) {
            Ok(diagram) => {
                let image = self.renderer.render(&diagram)?;
                self.image = Some(image);
                self.eval = EvalState::Idle;
            }
            Err(error) if error.is_parse() => {
                debug!(%error, "source does not evaluate to a valid diagram");
                self.eval = EvalState::Invalid {
                    message: error.to_string(),
                };
            }
            Err(error) => return Err(error),
        }
        Ok(&self.eval)
    }

    /// Load a file into the editor and evaluate it
    ///
    /// On I/O failure the source, image, and record are left unchanged.
    pub fn open(&mut self, path: &Path) -> Result<&EvalState, DiagramError> {
        let text = fs::read_to_string(path)?;
        self.record.file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "simple.diag".to_string());
        self.record.directory = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        self.source = text;
        debug!(file = %self.record.file_name, "opened file");
        self.evaluate()
    }

    /// Save to the recorded path, or report that a path is still needed
    pub fn save(&mut self) -> Result<SaveOutcome, DiagramError> {
        if !self.record.already_saved {
            return Ok(SaveOutcome::PathRequired);
        }
        let path = self.record.path();
        self.write_current(&path)?;
        Ok(SaveOutcome::Written(path))
    }

    /// Save to a concrete destination chosen by the user
    pub fn save_to(
        &mut self,
        directory: PathBuf,
        file_name: String,
    ) -> Result<PathBuf, DiagramError> {
        let path = directory.join(&file_name);
        self.write_current(&path)?;
        self.record.directory = directory;
        self.record.file_name = file_name;
        self.record.already_saved = true;
        debug!(path = %path.display(), "saved");
        Ok(path)
    }

    fn write_current(&self, path: &Path) -> Result<(), DiagramError> {
        match self.mode {
            SaveMode::Source => fs::write(path, self.source.as_bytes())?,
            SaveMode::Image => {
                let image = self.image.as_ref().ok_or_else(|| {
                    DiagramError::render("nothing has been rendered yet".to_string())
                })?;
                fs::write(path, image.data())?;
            }
        }
        Ok(())
    }
}
