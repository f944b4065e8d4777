//! Command-line interface for the seqpad utility
//!
//! Three ways in: `edit` opens the interactive terminal editor, `render`
//! runs one compile+render cycle on a file or stdin, `validate` checks
//! syntax and reports the error position.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use seqpad::core::logging::init_logging;
use seqpad::editor::EditorState;
use seqpad::{evaluate_with_config, DiagramError, ImageFormat, RenderConfig};

use crate::term;

/// Seqpad - edit and render seqdiag-style sequence diagrams
#[derive(Parser)]
#[command(name = "seqpad")]
#[command(about = "A sequence diagram editor and renderer for the terminal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive editor
    Edit {
        /// File to load on startup
        file: Option<PathBuf>,

        /// Image format for the preview pane and image saves
        #[arg(long, value_enum, default_value_t = FormatChoice::Text)]
        format: FormatChoice,

        /// Draw with Unicode box-drawing glyphs instead of plain ASCII
        #[arg(long)]
        antialias: bool,

        /// Bitmap font file for PNG output (96 glyphs x 5 bytes)
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Render a diagram file to an image
    Render {
        /// Input file containing diagram source (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout; defaults to <input>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Image format
        #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
        format: FormatChoice,

        /// Draw with Unicode box-drawing glyphs instead of plain ASCII
        #[arg(long)]
        antialias: bool,

        /// Bitmap font file for PNG output (96 glyphs x 5 bytes)
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Check diagram syntax
    Validate {
        /// Input file to validate (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Report in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Supported image formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatChoice {
    Png,
    Text,
}

impl From<FormatChoice> for ImageFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Png => ImageFormat::Png,
            FormatChoice::Text => ImageFormat::Text,
        }
    }
}

/// Machine-readable `validate --json` report
#[derive(Debug, Serialize)]
struct ValidateReport {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    actors: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exchanges: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ValidateError>,
}

#[derive(Debug, Serialize)]
struct ValidateError {
    message: String,
    line: usize,
    column: usize,
}

/// Main CLI application
pub struct SeqpadApp;

impl SeqpadApp {
    pub fn new() -> Self {
        Self
    }

    fn build_config(
        format: FormatChoice,
        antialias: bool,
        font: Option<PathBuf>,
    ) -> RenderConfig {
        let mut config = RenderConfig::new(format.into(), antialias);
        if let Some(path) = font {
            config = config.with_font_path(path);
        }
        config
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("SEQPAD_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("SEQPAD_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Seqpad v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Edit {
                file,
                format,
                antialias,
                font,
            } => self.edit_command(file, Self::build_config(format, antialias, font)),
            Commands::Render {
                input,
                output,
                format,
                antialias,
                font,
            } => self.render_command(
                input,
                output,
                Self::build_config(format, antialias, font),
                cli.verbose,
            ),
            Commands::Validate { input, json } => self.validate_command(input, json, cli.verbose),
        }
    }

    /// Handle the edit command
    fn edit_command(&self, file: Option<PathBuf>, config: RenderConfig) -> Result<()> {
        let state = match file {
            Some(path) => EditorState::from_file(&path, config)?,
            None => EditorState::new(config)?,
        };
        term::run_editor(state)
    }

    /// Handle the render command
    fn render_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        config: RenderConfig,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input.as_deref())?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let format = config.format;
        let image = evaluate_with_config(&content, config)?;

        if verbose {
            eprintln!("Rendered {} bytes of {}", image.len(), format);
        }

        let output = output.or_else(|| Some(default_output(input.as_deref(), format)));
        self.write_output(output, image.data())
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let content = self.read_input(input.as_deref())?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        match seqpad::compile(&content) {
            Ok(diagram) => {
                let report = ValidateReport {
                    valid: true,
                    actors: Some(diagram.actor_count()),
                    exchanges: Some(diagram.exchange_count()),
                    error: None,
                };
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!(
                        "✓ Valid diagram ({} actors, {} exchanges)",
                        diagram.actor_count(),
                        diagram.exchange_count()
                    );
                }
                Ok(())
            }
            Err(DiagramError::Parse {
                message,
                line,
                column,
            }) => {
                if json {
                    let report = ValidateReport {
                        valid: false,
                        actors: None,
                        exchanges: None,
                        error: Some(ValidateError {
                            message: message.clone(),
                            line,
                            column,
                        }),
                    };
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("✗ Invalid diagram at {}:{}: {}", line, column, message);
                }
                Err(anyhow!("invalid diagram"))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<&Path>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output bytes to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, data: &[u8]) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => fs::write(&path, data)
                .map_err(|e| anyhow!("Failed to write output file '{}': {}", path.display(), e)),
            _ => {
                let mut stdout = io::stdout();
                stdout.write_all(data)?;
                stdout.flush()?;
                Ok(())
            }
        }
    }
}

impl Default for SeqpadApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Output path used when `--output` is omitted: the input name with the
/// format's extension, or `diagram.<ext>` when reading stdin
fn default_output(input: Option<&Path>, format: ImageFormat) -> PathBuf {
    let stem = input
        .filter(|path| path.to_string_lossy() != "-")
        .and_then(|path| path.file_stem())
        .and_then(|stem| stem.to_str())
        .unwrap_or("diagram");
    PathBuf::from(format!("{}.{}", stem, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing_render_command() {
        let args = vec![
            "seqpad", "render", "--input", "in.diag", "--output", "out.png", "--antialias",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Render {
                input,
                output,
                format,
                antialias,
                font,
            } => {
                assert_eq!(input.unwrap().to_string_lossy(), "in.diag");
                assert_eq!(output.unwrap().to_string_lossy(), "out.png");
                assert_eq!(format, FormatChoice::Png); // default
                assert!(antialias);
                assert!(font.is_none());
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_parsing_edit_command() {
        let args = vec!["seqpad", "edit", "session.diag"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Edit { file, format, .. } => {
                assert_eq!(file.unwrap().to_string_lossy(), "session.diag");
                assert_eq!(format, FormatChoice::Text); // preview default
            }
            _ => panic!("Expected Edit command"),
        }
    }

    #[test]
    fn test_cli_parsing_validate_command() {
        let args = vec!["seqpad", "validate", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Validate { input, json } => {
                assert!(input.is_none());
                assert!(json);
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(vec!["seqpad", "--verbose", "validate"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_format_choice_maps_to_image_format() {
        assert_eq!(ImageFormat::from(FormatChoice::Png), ImageFormat::Png);
        assert_eq!(ImageFormat::from(FormatChoice::Text), ImageFormat::Text);
    }

    #[test]
    fn test_default_output_from_input_name() {
        let path = default_output(Some(Path::new("flows/net.diag")), ImageFormat::Png);
        assert_eq!(path, PathBuf::from("net.png"));
    }

    #[test]
    fn test_default_output_from_stdin() {
        assert_eq!(
            default_output(Some(Path::new("-")), ImageFormat::Text),
            PathBuf::from("diagram.txt")
        );
        assert_eq!(default_output(None, ImageFormat::Png), PathBuf::from("diagram.png"));
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.diag");
        fs::write(&path, "diagram { a -> b; }").unwrap();

        let app = SeqpadApp::new();
        let content = app.read_input(Some(&path)).unwrap();
        assert_eq!(content, "diagram { a -> b; }");
    }

    #[test]
    fn test_read_input_missing_file() {
        let app = SeqpadApp::new();
        assert!(app.read_input(Some(Path::new("/no/such/file"))).is_err());
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");

        let app = SeqpadApp::new();
        app.write_output(Some(path.clone()), b"bytes").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"bytes");
    }

    #[test]
    fn test_render_command_writes_png() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.diag");
        let output = dir.path().join("out.png");
        fs::write(&input, "diagram { a -> b; }").unwrap();

        let app = SeqpadApp::new();
        app.render_command(
            Some(input),
            Some(output.clone()),
            RenderConfig::default(),
            false,
        )
        .unwrap();

        let bytes = fs::read(&output).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);

        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let reader = decoder.read_info().unwrap();
        assert!(reader.info().width > 0);
        assert!(reader.info().height > 0);
    }

    #[test]
    fn test_render_command_writes_text() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.diag");
        let output = dir.path().join("out.txt");
        fs::write(&input, "diagram { alice -> bob; }").unwrap();

        let app = SeqpadApp::new();
        app.render_command(
            Some(input),
            Some(output.clone()),
            RenderConfig::new(ImageFormat::Text, false),
            false,
        )
        .unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("alice"));
        assert!(text.contains("bob"));
    }

    #[test]
    fn test_render_command_invalid_source_fails() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.diag");
        fs::write(&input, "diagram { nope").unwrap();

        let app = SeqpadApp::new();
        let result = app.render_command(Some(input), None, RenderConfig::default(), false);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_command_valid() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("ok.diag");
        fs::write(&input, "diagram { a -> b; }").unwrap();

        let app = SeqpadApp::new();
        assert!(app.validate_command(Some(input), false, false).is_ok());
    }

    #[test]
    fn test_validate_command_invalid() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.diag");
        fs::write(&input, "diagram { a -> ").unwrap();

        let app = SeqpadApp::new();
        assert!(app.validate_command(Some(input.clone()), false, false).is_err());
        assert!(app.validate_command(Some(input), true, false).is_err());
    }

    #[test]
    fn test_validate_report_serializes_error() {
        let report = ValidateReport {
            valid: false,
            actors: None,
            exchanges: None,
            error: Some(ValidateError {
                message: "unexpected end of input".to_string(),
                line: 2,
                column: 7,
            }),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["error"]["line"], 2);
        assert!(json.get("actors").is_none());
    }
}
